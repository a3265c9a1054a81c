//! Session-level error types shared across flows, stores, and the request pipeline.

// self
use crate::_prelude::*;

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure, cancelled request, or a status outside the success range.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Base parameter encoding failed before any signing took place.
	#[error("Parameters could not be encoded: {source}.")]
	Encoding {
		/// Underlying request builder failure.
		#[source]
		source: ReqwestError,
	},
	/// Response body is not valid JSON.
	#[error("JSON could not be serialized: {source}.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Response body is JSON but lacks the expected shape.
	#[error("Invalid server response")]
	InvalidResponse,
}
impl Error {
	/// Human-readable description handed to completion callbacks.
	pub fn error_description(&self) -> String {
		self.to_string()
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Secrets file could not be read.
	#[error("Secrets file `{path}` could not be read.")]
	SecretsIo {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Secrets payload does not match the expected schema.
	#[error("Secrets payload is invalid at `{path}`: {message}.")]
	Secrets {
		/// JSON path of the offending field.
		path: String,
		/// Parser message.
		message: String,
	},
	/// A URL or path could not be resolved against the API base.
	#[error("`{input}` is not a valid URL or API path.")]
	InvalidUrl {
		/// Raw input supplied by the caller.
		input: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{url}`: {source}.")]
	Network {
		/// Request URL with the query string stripped.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Server answered with a status outside `200..300`.
	#[error("Response status code was unacceptable: {status}.")]
	Status {
		/// HTTP status code returned by the server.
		status: u16,
	},
	/// The in-flight request task was cancelled or panicked.
	#[error("Request task did not complete.")]
	Cancelled(#[from] tokio::task::JoinError),
}
impl TransportError {
	/// Wraps a reqwest failure, keeping credentials out of the recorded URL.
	pub fn network(err: ReqwestError) -> Self {
		let url = err.url().map(redacted_url).unwrap_or_default();

		Self::Network { url, source: Box::new(err.without_url()) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

pub(crate) fn redacted_url(url: &Url) -> String {
	let mut url = url.clone();

	url.set_query(None);

	url.to_string()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn invalid_response_has_fixed_description() {
		assert_eq!(Error::InvalidResponse.error_description(), "Invalid server response");
	}

	#[test]
	fn status_error_reads_like_validation_failure() {
		let err: Error = TransportError::Status { status: 401 }.into();

		assert_eq!(err.error_description(), "Response status code was unacceptable: 401.");
	}

	#[test]
	fn redacted_url_drops_query_string() {
		let url = Url::parse("https://api.soundcloud.com/me?oauth_token=secret&client_id=cid")
			.expect("Fixture URL should parse.");

		assert_eq!(redacted_url(&url), "https://api.soundcloud.com/me");
	}
}
