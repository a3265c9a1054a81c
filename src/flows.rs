//! Session orchestration: login, logout, signed requests, and profile fetches.

pub mod dispatch;
pub mod login;
pub mod profile;
pub mod request;

pub use dispatch::*;
pub use login::*;
pub use profile::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientCredentials},
	http::ReqwestHttpClient,
	middleware::{MiddlewarePipeline, QueryAuthSigner, RequestMiddleware},
	provider::ApiDescriptor,
	store::CredentialStore,
};

/// Authenticated session against one API descriptor.
///
/// The session owns the credential store, the HTTP client, the static client
/// credentials, and the middleware pipeline, and is passed explicitly to whatever needs
/// to authenticate. Cloning is cheap; clones share the store, connection pool, and login
/// guard.
#[derive(Clone)]
pub struct Session {
	/// HTTP client used for the token exchange and every API request.
	pub http_client: ReqwestHttpClient,
	/// Facade over the persistent token backend.
	pub store: CredentialStore,
	/// Token endpoint and API base.
	pub descriptor: ApiDescriptor,
	/// Client id/secret and the account used for the password grant.
	pub credentials: Arc<ClientCredentials>,
	/// Middleware applied to every request built by [`Session::request`].
	pub pipeline: MiddlewarePipeline,
	login_guard: Arc<AsyncMutex<()>>,
}
impl Session {
	/// Creates a session against the public SoundCloud API with a default HTTP client.
	pub fn new(store: impl Into<CredentialStore>, credentials: ClientCredentials) -> Result<Self> {
		Ok(Self::with_http_client(
			store,
			ApiDescriptor::soundcloud()?,
			credentials,
			ReqwestHttpClient::default(),
		))
	}

	/// Creates a session that reuses the caller-provided descriptor and transport.
	///
	/// The pipeline starts with a [`QueryAuthSigner`] for the configured client id.
	pub fn with_http_client(
		store: impl Into<CredentialStore>,
		descriptor: ApiDescriptor,
		credentials: ClientCredentials,
		http_client: impl Into<ReqwestHttpClient>,
	) -> Self {
		let pipeline = MiddlewarePipeline::new().with(QueryAuthSigner::new(&credentials.client_id));

		Self {
			http_client: http_client.into(),
			store: store.into(),
			descriptor,
			credentials: Arc::new(credentials),
			pipeline,
			login_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Opens a session backed by the default OS keychain entry.
	#[cfg(feature = "keychain")]
	pub fn with_keychain(credentials: ClientCredentials) -> Result<Self> {
		let store = crate::store::KeychainStore::open_default()?;

		Self::new(Arc::new(store), credentials)
	}

	/// Appends a middleware stage after the built-in signer.
	pub fn with_middleware(mut self, middleware: impl 'static + RequestMiddleware) -> Self {
		self.pipeline = self.pipeline.with(middleware);

		self
	}

	/// Current access token, if any.
	pub fn access_token(&self) -> Option<AccessToken> {
		self.store.get()
	}

	/// Returns `true` when a token is stored.
	pub fn is_authenticated(&self) -> bool {
		self.store.has_token()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.credentials.client_id)
			.field("pipeline", &self.pipeline)
			.field("authenticated", &self.is_authenticated())
			.finish()
	}
}
