//! Request value objects, parameter encodings, and the reqwest transport wrapper.
//!
//! [`OutgoingRequest`] describes what the caller wants (method, URL or API path,
//! parameters, encoding, headers). [`OutgoingRequest::into_base_request`] performs the
//! base encoding step and yields a plain [`ReqwestRequest`], which the middleware
//! pipeline then decorates before [`RequestHandle::spawn`] puts it in flight.

// std
use std::ops::Deref;
// crates.io
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	error::{TransportError, redacted_url},
};

pub use reqwest::Method;

/// Request parameters keyed by name. Scalar values are url/form encodable; nested
/// values only survive [`ParameterEncoding::Json`].
pub type Parameters = BTreeMap<String, Value>;

/// Strategy for placing parameters on a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterEncoding {
	/// Query string for `GET`, `HEAD`, and `DELETE`; form body otherwise.
	#[default]
	Url,
	/// Always the query string.
	QueryString,
	/// Always a form-urlencoded body.
	Form,
	/// JSON body.
	Json,
}
impl ParameterEncoding {
	fn placement(self, method: &Method) -> Placement {
		match self {
			Self::Url =>
				if matches!(*method, Method::GET | Method::HEAD | Method::DELETE) {
					Placement::Query
				} else {
					Placement::Form
				},
			Self::QueryString => Placement::Query,
			Self::Form => Placement::Form,
			Self::Json => Placement::Json,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
	Query,
	Form,
	Json,
}

/// Outgoing request description passed through the build → sign → dispatch pipeline.
#[derive(Clone, Debug)]
pub struct OutgoingRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL or a path relative to the API base.
	pub target: String,
	/// Optional parameters; absent parameters are encoded as an empty set.
	pub parameters: Option<Parameters>,
	/// Base encoding applied before any middleware runs.
	pub encoding: ParameterEncoding,
	/// Extra headers.
	pub headers: HeaderMap,
}
impl OutgoingRequest {
	/// Creates a request with no parameters, URL encoding, and no extra headers.
	pub fn new(method: Method, target: impl Into<String>) -> Self {
		Self {
			method,
			target: target.into(),
			parameters: None,
			encoding: ParameterEncoding::default(),
			headers: HeaderMap::new(),
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(target: impl Into<String>) -> Self {
		Self::new(Method::GET, target)
	}

	/// Shorthand for a `POST` request.
	pub fn post(target: impl Into<String>) -> Self {
		Self::new(Method::POST, target)
	}

	/// Replaces the parameter set.
	pub fn parameters(mut self, parameters: Parameters) -> Self {
		self.parameters = Some(parameters);

		self
	}

	/// Adds or replaces a single parameter.
	pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.parameters.get_or_insert_with(Parameters::new).insert(name.into(), value.into());

		self
	}

	/// Overrides the parameter encoding.
	pub fn encoding(mut self, encoding: ParameterEncoding) -> Self {
		self.encoding = encoding;

		self
	}

	/// Adds a header, replacing any previous value under the same name.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Merges a header map into the request.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers.extend(headers);

		self
	}

	/// Performs the base encoding step against an already resolved URL.
	///
	/// Encoding failures (for example a nested value under url encoding) are returned
	/// as [`Error::Encoding`] and nothing else happens to the request.
	pub fn into_base_request(self, client: &ReqwestClient, url: Url) -> Result<ReqwestRequest> {
		let parameters = self.parameters.unwrap_or_default();
		let builder = client.request(self.method.clone(), url).headers(self.headers);
		let builder = match self.encoding.placement(&self.method) {
			Placement::Query => builder.query(&parameters),
			Placement::Form => builder.form(&parameters),
			Placement::Json => builder.json(&parameters),
		};

		builder.build().map_err(|source| Error::Encoding { source })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with a per-request timeout.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
impl From<ReqwestClient> for ReqwestHttpClient {
	fn from(client: ReqwestClient) -> Self {
		Self::with_client(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Handle to a request that is already in flight on the Tokio runtime.
///
/// Awaiting the handle directly yields the raw response; [`RequestHandle::validated`]
/// and [`RequestHandle::json`] add status validation and JSON decoding.
pub struct RequestHandle {
	method: Method,
	url: Url,
	task: JoinHandle<Result<ReqwestResponse, ReqwestError>>,
}
impl RequestHandle {
	/// Spawns `request` on the current Tokio runtime and returns immediately.
	pub fn spawn(client: &ReqwestClient, request: ReqwestRequest) -> Self {
		let method = request.method().clone();
		let url = request.url().clone();
		let client = client.clone();
		let task = tokio::spawn(async move { client.execute(request).await });

		Self { method, url, task }
	}

	/// Method of the dispatched request.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Final (signed) URL of the dispatched request. Contains credentials; avoid logging it.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Returns `true` once the transport has finished.
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}

	/// Cancels the in-flight request.
	pub fn abort(&self) {
		self.task.abort();
	}

	/// Waits for the raw response without status validation.
	pub async fn response(self) -> Result<ReqwestResponse> {
		let response = self.task.await.map_err(TransportError::from)?.map_err(TransportError::from)?;

		Ok(response)
	}

	/// Waits for the response and requires a `2xx` status.
	pub async fn validated(self) -> Result<ReqwestResponse> {
		validate(self.response().await?)
	}

	/// Waits for a `2xx` response and decodes its body as JSON.
	pub async fn json(self) -> Result<Value> {
		read_json(self.validated().await?).await
	}
}
impl IntoFuture for RequestHandle {
	type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;
	type Output = Result<ReqwestResponse>;

	fn into_future(self) -> Self::IntoFuture {
		Box::pin(self.response())
	}
}
impl Debug for RequestHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestHandle")
			.field("method", &self.method)
			.field("url", &redacted_url(&self.url))
			.field("finished", &self.task.is_finished())
			.finish()
	}
}

/// Rejects responses whose status falls outside `200..300`.
pub fn validate(response: ReqwestResponse) -> Result<ReqwestResponse> {
	let status = response.status();

	if status.is_success() {
		Ok(response)
	} else {
		Err(TransportError::Status { status: status.as_u16() }.into())
	}
}

/// Reads the whole body and parses it as JSON.
pub async fn read_json(response: ReqwestResponse) -> Result<Value> {
	let bytes = response.bytes().await.map_err(TransportError::from)?;

	serde_json::from_slice(&bytes).map_err(|source| Error::ResponseParse { source })
}
