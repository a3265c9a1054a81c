// self
use crate::{_prelude::*, provider::ApiDescriptor};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ApiDescriptorError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// API base is mandatory.
	#[error("Missing API base URL.")]
	MissingApiBase,
	/// Endpoints must speak HTTP(S).
	#[error("The {endpoint} endpoint must use HTTP or HTTPS: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// API base must accept joined paths.
	#[error("The API base cannot carry request paths: {url}.")]
	OpaqueApiBase {
		/// Base URL that failed validation.
		url: String,
	},
}

/// Builder for [`ApiDescriptor`] values.
#[derive(Debug, Default)]
pub struct ApiDescriptorBuilder {
	/// Token endpoint used for the password grant.
	pub token_endpoint: Option<Url>,
	/// Base URL for API requests.
	pub api_base: Option<Url>,
}
impl ApiDescriptorBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the API base URL.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ApiDescriptor, ApiDescriptorError> {
		let token_endpoint = self.token_endpoint.ok_or(ApiDescriptorError::MissingTokenEndpoint)?;
		let mut api_base = self.api_base.ok_or(ApiDescriptorError::MissingApiBase)?;

		// `Url::join` replaces the last segment unless the base ends with a slash.
		if !api_base.path().ends_with('/') {
			let path = format!("{}/", api_base.path());

			api_base.set_path(&path);
		}

		let descriptor = ApiDescriptor { token_endpoint, api_base };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ApiDescriptor {
	fn validate(&self) -> Result<(), ApiDescriptorError> {
		validate_endpoint("token", &self.token_endpoint)?;
		validate_endpoint("api", &self.api_base)?;

		if self.api_base.cannot_be_a_base() {
			return Err(ApiDescriptorError::OpaqueApiBase { url: self.api_base.to_string() });
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ApiDescriptorError> {
	match url.scheme() {
		"https" | "http" => Ok(()),
		_ => Err(ApiDescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}
