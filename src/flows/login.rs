//! Password-grant login, token recovery, and logout.
//!
//! [`Session::login`] first looks for a stored token and only contacts the token
//! endpoint when none exists. Concurrent logins on one session coalesce behind a
//! singleflight guard: the first caller performs the exchange and the rest re-read the
//! store once the guard is released.

// crates.io
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::TransportError,
	flows::{CompletionQueue, Session},
	http::{self, OutgoingRequest, Parameters},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// How a successful [`Session::login`] obtained its token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
	/// A token was already stored; no network I/O happened.
	Recovered,
	/// The token endpoint issued a new token, now persisted.
	Authenticated,
}

impl Session {
	/// Ensures a token is stored, performing the password grant when needed.
	pub async fn login(&self) -> Result<LoginOutcome> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				if self.store.has_token() {
					tracing::debug!("Found an existing token.");

					return Ok(LoginOutcome::Recovered);
				}

				let _singleflight = self.login_guard.lock().await;

				if self.store.has_token() {
					tracing::debug!("Token was stored by a concurrent login.");

					return Ok(LoginOutcome::Recovered);
				}

				let token = self.exchange_password().await?;

				self.store.set(Some(token))?;

				tracing::info!("Got an access token.");

				Ok(LoginOutcome::Authenticated)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				tracing::warn!(error = %e, "Login error.");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	/// Spawns [`Session::login`] and reports through `queue`.
	///
	/// `on_complete` receives `None` on success or the error description on failure. It
	/// always runs on the context draining `queue`, including when a stored token makes
	/// the login finish without I/O. Must be called from within a Tokio runtime.
	pub fn login_with<F>(&self, queue: &CompletionQueue, on_complete: F) -> JoinHandle<()>
	where
		F: 'static + Send + FnOnce(Option<String>),
	{
		let session = self.clone();
		let queue = queue.clone();

		tokio::spawn(async move {
			let error = session.login().await.err().map(|e| e.error_description());

			queue.dispatch(move || on_complete(error));
		})
	}

	/// Deletes the stored token. Removal failures are logged and ignored.
	pub fn log_out(&self) {
		const KIND: FlowKind = FlowKind::Logout;

		let _span = FlowSpan::new(KIND, "log_out").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.store.clear();
		obs::record_flow_outcome(KIND, FlowOutcome::Success);
	}

	async fn exchange_password(&self) -> Result<AccessToken> {
		let form: Parameters = self
			.credentials
			.password_grant_form()
			.into_iter()
			.map(|(name, value)| (name.to_owned(), Value::from(value)))
			.collect();
		let request = self.build_base(
			OutgoingRequest::post(self.descriptor.token_endpoint.as_str()).parameters(form),
		)?;
		let response = self.http_client.execute(request).await.map_err(TransportError::from)?;
		let body = http::read_json(http::validate(response)?).await?;

		access_token_from(&body)
	}
}

fn access_token_from(body: &Value) -> Result<AccessToken> {
	match body.get("access_token").and_then(Value::as_str) {
		Some(token) => Ok(AccessToken::new(token)),
		None => {
			tracing::warn!(shape = json_shape(body), "Unexpected JSON response from login.");

			Err(Error::InvalidResponse)
		},
	}
}

fn json_shape(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
