//! Signed request construction and dispatch.

// self
use crate::{
	_prelude::*,
	error::redacted_url,
	flows::Session,
	http::{OutgoingRequest, RequestHandle},
	middleware::RequestContext,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Session {
	/// Builds, signs, and dispatches `request`, returning as soon as it is in flight.
	///
	/// Absent parameters are treated as an empty set. A base encoding failure is returned
	/// unchanged and nothing is sent. Without a stored token the request still goes out,
	/// signed with `client_id` only, and a warning is logged.
	///
	/// Must be called from within a Tokio runtime.
	pub fn request(&self, request: OutgoingRequest) -> Result<RequestHandle> {
		const KIND: FlowKind = FlowKind::Request;

		let _span = FlowSpan::new(KIND, "request").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let prepared = match self.prepare(request) {
			Ok(prepared) => prepared,
			Err(e) => {
				tracing::warn!(error = %e, "Request could not be prepared.");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				return Err(e);
			},
		};

		tracing::debug!(
			method = %prepared.method(),
			url = %redacted_url(prepared.url()),
			"Dispatching signed request."
		);

		let handle = RequestHandle::spawn(&self.http_client, prepared);

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		Ok(handle)
	}

	/// Runs the build → sign steps of [`Session::request`] without dispatching.
	pub fn prepare(&self, request: OutgoingRequest) -> Result<ReqwestRequest> {
		let base = self.build_base(request)?;
		let token = self.store.get();
		let context = RequestContext { access_token: token.as_ref() };

		self.pipeline.apply(base, &context)
	}

	/// Resolves the target against the API base and performs the base encoding.
	pub(crate) fn build_base(&self, request: OutgoingRequest) -> Result<ReqwestRequest> {
		let url = self.descriptor.resolve(&request.target)?;

		request.into_base_request(&self.http_client, url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::ClientCredentials,
		http::{Method, ParameterEncoding},
		store::MemoryStore,
	};

	fn session(store: MemoryStore) -> Session {
		Session::new(Arc::new(store), ClientCredentials::new("CID", "cs", "dj", "pw"))
			.expect("Session should build.")
	}

	fn query_pairs(request: &ReqwestRequest) -> Vec<(String, String)> {
		request.url().query_pairs().into_owned().collect()
	}

	#[test]
	fn request_without_parameters_carries_only_signing_items() {
		let prepared = session(MemoryStore::with_token("TOK"))
			.prepare(OutgoingRequest::get("/me"))
			.expect("Parameterless request should prepare.");

		assert_eq!(prepared.url().path(), "/me");
		assert_eq!(
			query_pairs(&prepared),
			vec![("oauth_token".into(), "TOK".into()), ("client_id".into(), "CID".into())]
		);
	}

	#[test]
	fn signing_prepends_to_encoded_parameters() {
		let prepared = session(MemoryStore::with_token("TOK"))
			.prepare(OutgoingRequest::get("https://api.soundcloud.com/tracks").parameter("q", "x"))
			.expect("Request should prepare.");

		assert_eq!(prepared.url().query(), Some("oauth_token=TOK&client_id=CID&q=x"));
	}

	#[test]
	fn unauthenticated_request_still_prepares() {
		let prepared = session(MemoryStore::default())
			.prepare(OutgoingRequest::get("/me?foo=bar"))
			.expect("Unauthenticated request should still prepare.");

		assert_eq!(prepared.url().query(), Some("client_id=CID&foo=bar"));
	}

	#[test]
	fn post_keeps_parameters_in_body_and_credentials_in_query() {
		let prepared = session(MemoryStore::with_token("TOK"))
			.prepare(OutgoingRequest::new(Method::POST, "/playlists").parameter("title", "mix"))
			.expect("POST request should prepare.");
		let body = prepared
			.body()
			.and_then(|body| body.as_bytes())
			.expect("Form body should be buffered.");

		assert_eq!(body, b"title=mix");
		assert_eq!(prepared.url().query(), Some("oauth_token=TOK&client_id=CID"));
	}

	#[test]
	fn encoding_failure_is_returned_unchanged() {
		let err = session(MemoryStore::with_token("TOK"))
			.prepare(
				OutgoingRequest::get("/tracks")
					.parameter("ids", serde_json::json!([1, 2]))
					.encoding(ParameterEncoding::QueryString),
			)
			.expect_err("Arrays cannot be query encoded.");

		assert!(matches!(err, Error::Encoding { .. }));
	}

	#[tokio::test]
	async fn request_returns_in_flight_handle() {
		let handle = session(MemoryStore::with_token("TOK"))
			.request(OutgoingRequest::get("http://127.0.0.1:9/me"))
			.expect("Request should dispatch.");

		assert_eq!(handle.method(), &Method::GET);
		assert_eq!(handle.url().query(), Some("oauth_token=TOK&client_id=CID"));

		handle.abort();
	}

	#[cfg(feature = "metrics")]
	mod flow_metrics {
		// crates.io
		use metrics::{
			Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
		};
		// self
		use super::*;

		#[derive(Default)]
		struct LabelRecorder(Mutex<Vec<String>>);
		impl LabelRecorder {
			fn recorded(&self) -> Vec<String> {
				self.0.lock().clone()
			}
		}
		impl Recorder for LabelRecorder {
			fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
				let labels =
					key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect::<Vec<_>>();

				self.0.lock().push(labels.join(","));

				Counter::noop()
			}

			fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
				Gauge::noop()
			}

			fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
				Histogram::noop()
			}
		}

		#[tokio::test]
		async fn dispatched_request_records_attempt_and_success() {
			let recorder = LabelRecorder::default();
			let session = session(MemoryStore::with_token("TOK"));
			let handle = metrics::with_local_recorder(&recorder, || {
				session.request(OutgoingRequest::get("http://127.0.0.1:9/me"))
			})
			.expect("Request should dispatch.");

			handle.abort();

			assert_eq!(
				recorder.recorded(),
				vec!["flow=request,outcome=attempt", "flow=request,outcome=success"]
			);
		}

		#[test]
		fn encoding_failure_records_attempt_and_failure() {
			let recorder = LabelRecorder::default();
			let session = session(MemoryStore::with_token("TOK"));
			let result = metrics::with_local_recorder(&recorder, || {
				session.request(
					OutgoingRequest::get("/tracks")
						.parameter("ids", serde_json::json!([1, 2]))
						.encoding(ParameterEncoding::QueryString),
				)
			});

			assert!(matches!(result, Err(Error::Encoding { .. })));
			assert_eq!(
				recorder.recorded(),
				vec!["flow=request,outcome=attempt", "flow=request,outcome=failure"]
			);
		}
	}
}
