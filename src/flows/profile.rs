//! Logged-in user profile (`GET /me`).

// self
use crate::{
	_prelude::*,
	flows::Session,
	http::OutgoingRequest,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// API path of the logged-in user's profile.
pub const PROFILE_PATH: &str = "/me";

/// Subset of the `/me` payload the client reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Display name; empty when absent or not a string.
	pub full_name: String,
	/// Account permalink name.
	pub username: Option<String>,
	/// Numeric user id.
	pub id: Option<u64>,
}
impl UserProfile {
	/// Reads the profile leniently from a JSON object.
	pub fn from_json(value: &Value) -> Result<Self> {
		let object = value.as_object().ok_or(Error::InvalidResponse)?;

		Ok(Self {
			full_name: object
				.get("full_name")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_owned(),
			username: object.get("username").and_then(Value::as_str).map(str::to_owned),
			id: object.get("id").and_then(Value::as_u64),
		})
	}

	/// Greeting line shown after login.
	pub fn greeting(&self) -> String {
		format!("Welcome, {}", self.full_name)
	}
}

impl Session {
	/// Fetches the logged-in user's profile through a signed request.
	pub async fn fetch_profile(&self) -> Result<UserProfile> {
		const KIND: FlowKind = FlowKind::Profile;

		let span = FlowSpan::new(KIND, "fetch_profile");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = self.request(OutgoingRequest::get(PROFILE_PATH))?.json().await?;

				UserProfile::from_json(&body)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				tracing::warn!(error = %e, "Profile fetch failed.");
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}
}
