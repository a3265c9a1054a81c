mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::{TOKEN_PATH, build_session};
use soundcloud_session::{
	auth::AccessToken,
	error::{Error, TransportError},
	flows::{LoginOutcome, completion_queue},
	store::MemoryStore,
};

fn token_body(token: &str) -> String {
	format!("{{\"access_token\":\"{token}\",\"scope\":\"*\"}}")
}

#[tokio::test]
async fn login_skips_network_when_token_is_stored() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::with_token("existing"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(token_body("new"));
		})
		.await;
	let outcome = session.login().await.expect("Stored token should satisfy login.");

	assert_eq!(outcome, LoginOutcome::Recovered);
	assert_eq!(store.snapshot(), Some(AccessToken::new("existing")));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn login_persists_issued_token_and_becomes_idempotent() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::default());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc123\"}");
		})
		.await;
	let first = session.login().await.expect("Token response should complete the login.");
	let second = session.login().await.expect("Second login should reuse the stored token.");

	assert_eq!(first, LoginOutcome::Authenticated);
	assert_eq!(second, LoginOutcome::Recovered);
	assert_eq!(store.snapshot(), Some(AccessToken::new("abc123")));
	assert!(session.is_authenticated());

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn login_rejects_payload_without_token() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::default());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let err = session.login().await.expect_err("Missing access_token should fail the login.");

	assert!(matches!(err, Error::InvalidResponse));
	assert_eq!(err.error_description(), "Invalid server response");
	assert_eq!(store.snapshot(), None);

	mock.assert_async().await;
}

#[tokio::test]
async fn login_surfaces_unacceptable_status() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::default());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let err = session.login().await.expect_err("Rejected credentials should fail the login.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 401 })));
	assert!(!err.error_description().is_empty());
	assert_eq!(store.snapshot(), None);

	mock.assert_async().await;
}

#[tokio::test]
async fn login_surfaces_non_json_body() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::default());
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "text/html").body("<html>maintenance</html>");
		})
		.await;
	let err = session.login().await.expect_err("HTML body should fail the login.");

	assert!(matches!(err, Error::ResponseParse { .. }));
	assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn concurrent_logins_share_one_exchange() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::default());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("shared"));
		})
		.await;
	let (first, second) = tokio::join!(session.login(), session.login());
	let mut outcomes = [
		first.expect("First concurrent login should succeed."),
		second.expect("Second concurrent login should succeed."),
	];

	outcomes.sort_by_key(|outcome| *outcome == LoginOutcome::Recovered);

	assert_eq!(outcomes, [LoginOutcome::Authenticated, LoginOutcome::Recovered]);
	assert_eq!(store.snapshot(), Some(AccessToken::new("shared")));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn login_with_reports_through_completion_queue() {
	let server = MockServer::start_async().await;
	let (session, _store) = build_session(&server, MemoryStore::with_token("existing"));
	let (queue, mut drain) = completion_queue();
	let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

	session
		.login_with(&queue, move |error| {
			tx.send(error).expect("Test receiver should be alive.");
		})
		.await
		.expect("Login task should not panic.");

	assert!(rx.try_recv().is_err(), "Callback must wait for the completion context.");
	assert_eq!(drain.run_pending(), 1);
	assert_eq!(rx.try_recv().expect("Callback should have run."), None);
}

#[tokio::test]
async fn login_with_passes_error_description() {
	let server = MockServer::start_async().await;
	let (session, _store) = build_session(&server, MemoryStore::default());
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let (queue, mut drain) = completion_queue();
	let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

	let _task = session.login_with(&queue, move |error| {
		tx.send(error).expect("Test receiver should be alive.");
	});

	assert!(drain.run_next().await);
	assert_eq!(
		rx.try_recv().expect("Callback should have run."),
		Some("Invalid server response".to_owned())
	);
}

#[tokio::test]
async fn log_out_clears_any_token() {
	let server = MockServer::start_async().await;
	let (session, store) = build_session(&server, MemoryStore::with_token("abc123"));

	session.log_out();

	assert_eq!(store.snapshot(), None);
	assert_eq!(session.access_token(), None);

	session.log_out();

	assert!(!session.is_authenticated());
}
