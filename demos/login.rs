//! Logs in (or recovers the keychain token), then greets the user by name.
//!
//! ```sh
//! RUST_LOG=soundcloud_session=debug cargo run --example login -- secrets.json
//! cargo run --example login -- secrets.json --log-out
//! ```
//!
//! `secrets.json` holds `client_id`, `client_secret`, `username`, and `password`.

// crates.io
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;
// self
use soundcloud_session::{
	auth::ClientCredentials,
	flows::{Session, completion_queue},
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let mut args = std::env::args().skip(1);
	let path = args.next().unwrap_or_else(|| "secrets.json".into());
	let log_out = args.any(|arg| arg == "--log-out");
	let session = Session::with_keychain(ClientCredentials::from_path(&path)?)?;

	if log_out {
		session.log_out();
		println!("Logged out.");

		return Ok(());
	}

	// The main task plays the UI's serial context: login reports back through the queue.
	let (queue, mut drain) = completion_queue();
	let (tx, rx) = oneshot::channel();
	let _task = session.login_with(&queue, move |error| {
		let _ = tx.send(error);
	});

	drain.run_next().await;

	if let Some(error) = rx.await? {
		eprintln!("womp womp! {error}");

		return Ok(());
	}

	println!("fetching user details...");

	match session.fetch_profile().await {
		Ok(profile) => println!("{}", profile.greeting()),
		Err(e) => eprintln!("Something went wrong! {e}"),
	}

	Ok(())
}
