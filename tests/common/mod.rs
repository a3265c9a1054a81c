// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
// self
use soundcloud_session::{
	auth::ClientCredentials, flows::Session, http::ReqwestHttpClient, provider::ApiDescriptor,
	store::MemoryStore, url::Url,
};

pub const CLIENT_ID: &str = "CID";
pub const CLIENT_SECRET: &str = "client-secret";
pub const USERNAME: &str = "dj";
pub const PASSWORD: &str = "hunter2";
pub const TOKEN_PATH: &str = "/oauth2/token";

pub fn descriptor(server: &MockServer) -> ApiDescriptor {
	ApiDescriptor::builder()
		.token_endpoint(
			Url::parse(&server.url(TOKEN_PATH)).expect("Mock token endpoint should parse."),
		)
		.api_base(Url::parse(&server.base_url()).expect("Mock API base should parse."))
		.build()
		.expect("Mock descriptor should build.")
}

/// Session pointed at `server`, plus a handle on its in-memory store.
pub fn build_session(server: &MockServer, store: MemoryStore) -> (Session, MemoryStore) {
	let session = Session::with_http_client(
		Arc::new(store.clone()),
		descriptor(server),
		ClientCredentials::new(CLIENT_ID, CLIENT_SECRET, USERNAME, PASSWORD),
		ReqwestHttpClient::default(),
	);

	(session, store)
}
