//! Query-string request signing.
//!
//! The API expects credentials in the URL query for every method, POST and PUT
//! included, so the signer edits the URL after the base encoding has placed the
//! caller's parameters.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::redacted_url,
	middleware::{RequestContext, RequestMiddleware},
};

/// Query parameter carrying the application identifier.
pub const CLIENT_ID_PARAM: &str = "client_id";
/// Query parameter carrying the access token.
pub const OAUTH_TOKEN_PARAM: &str = "oauth_token";

/// Appends `client_id` and, when a token is present, `oauth_token` to the URL query.
///
/// Each item is prepended, so a signed `?foo=bar` reads
/// `oauth_token=…&client_id=…&foo=bar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryAuthSigner {
	client_id: String,
}
impl QueryAuthSigner {
	/// Creates a signer for `client_id`.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: client_id.into() }
	}

	/// Configured client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Signs `url` in place.
	pub fn sign_url(&self, url: &mut Url, access_token: Option<&AccessToken>) {
		append_query_item(url, CLIENT_ID_PARAM, &self.client_id);

		match access_token {
			Some(token) => append_query_item(url, OAUTH_TOKEN_PARAM, token.expose()),
			None => tracing::warn!(
				url = %redacted_url(url),
				"No access token available; request will not be authenticated. Log in first."
			),
		}
	}
}
impl RequestMiddleware for QueryAuthSigner {
	fn name(&self) -> &'static str {
		"query_auth_signer"
	}

	fn apply(
		&self,
		mut request: ReqwestRequest,
		context: &RequestContext<'_>,
	) -> Result<ReqwestRequest> {
		self.sign_url(request.url_mut(), context.access_token);

		Ok(request)
	}
}

/// Inserts `name=value` ahead of the existing query items.
///
/// Existing items keep their original bytes and relative order; scheme, host, path,
/// and fragment are untouched.
pub fn append_query_item(url: &mut Url, name: &str, value: &str) {
	let item = form_urlencoded::Serializer::new(String::new()).append_pair(name, value).finish();
	let query = match url.query() {
		Some(existing) if !existing.is_empty() => format!("{item}&{existing}"),
		_ => item,
	};

	url.set_query(Some(&query));
}
