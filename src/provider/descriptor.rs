//! API descriptor data structures shared by all flows.

/// Builder API for assembling API descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Production token endpoint.
pub const SOUNDCLOUD_TOKEN_ENDPOINT: &str = "https://api.soundcloud.com/oauth2/token";
/// Production API base; request paths are joined onto it.
pub const SOUNDCLOUD_API_BASE: &str = "https://api.soundcloud.com/";

/// Immutable descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
	/// Endpoint receiving the password grant.
	pub token_endpoint: Url,
	/// Base URL that relative request paths resolve against.
	pub api_base: Url,
}
impl ApiDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ApiDescriptorBuilder {
		ApiDescriptorBuilder::new()
	}

	/// Descriptor for the public SoundCloud API.
	pub fn soundcloud() -> Result<Self, ConfigError> {
		let parse = |input: &str| {
			Url::parse(input).map_err(|source| ConfigError::InvalidUrl { input: input.into(), source })
		};

		Ok(Self {
			token_endpoint: parse(SOUNDCLOUD_TOKEN_ENDPOINT)?,
			api_base: parse(SOUNDCLOUD_API_BASE)?,
		})
	}

	/// Resolves an absolute URL or an API path (`/me`, `tracks/1`) against the API base.
	pub fn resolve(&self, url_or_path: &str) -> Result<Url, ConfigError> {
		match Url::parse(url_or_path) {
			Ok(url) => Ok(url),
			Err(url::ParseError::RelativeUrlWithoutBase) => self
				.api_base
				.join(url_or_path)
				.map_err(|source| ConfigError::InvalidUrl { input: url_or_path.into(), source }),
			Err(source) => Err(ConfigError::InvalidUrl { input: url_or_path.into(), source }),
		}
	}
}
