//! Static client configuration used by the password grant.

// std
use std::path::Path;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Client id/secret plus the account used for the password grant.
///
/// Values are read-only for the lifetime of a session and are usually supplied
/// out-of-band through a JSON secrets file:
///
/// ```json
/// { "client_id": "...", "client_secret": "...", "username": "...", "password": "..." }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// Registered application identifier, also appended to every signed request.
	pub client_id: String,
	/// Registered application secret.
	pub client_secret: Secret,
	/// Account username.
	pub username: String,
	/// Account password.
	pub password: Secret,
}
impl ClientCredentials {
	/// Creates credentials from explicit values.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		username: impl Into<String>,
		password: impl Into<Secret>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			username: username.into(),
			password: password.into(),
		}
	}

	/// Parses credentials from a JSON document, reporting the path of any invalid field.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|err| ConfigError::Secrets {
			path: err.path().to_string(),
			message: err.inner().to_string(),
		})
	}

	/// Loads credentials from a JSON secrets file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsIo {
			path: path.display().to_string(),
			source,
		})?;

		Self::from_json_str(&raw)
	}

	/// Form body for the password grant, in the order the token endpoint documents.
	pub(crate) fn password_grant_form(&self) -> Vec<(&'static str, &str)> {
		vec![
			("grant_type", "password"),
			("username", &self.username),
			("password", self.password.expose()),
			("client_id", &self.client_id),
			("client_secret", self.client_secret.expose()),
		]
	}
}
