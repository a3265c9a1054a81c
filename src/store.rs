//! Storage contracts and built-in stores for the session's access token.
//!
//! [`TokenStore`] is the backend seam (OS keychain, memory, or anything custom) and
//! [`CredentialStore`] is the facade flows talk to: reads never fail, writes report
//! failures, and removals are best-effort.

#[cfg(feature = "keychain")] pub mod keychain;
pub mod memory;

#[cfg(feature = "keychain")] pub use keychain::KeychainStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Backend contract for persisting a single access token.
///
/// Calls are synchronous from the caller's perspective; implementations are expected
/// to be fast enough to run on an async executor thread.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the stored token, if present.
	fn load(&self) -> Result<Option<AccessToken>, StoreError>;

	/// Persists or replaces the stored token.
	fn save(&self, token: &AccessToken) -> Result<(), StoreError>;

	/// Removes the stored token. Removing an absent token succeeds.
	fn remove(&self) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl StoreError {
	/// Builds a backend error from any displayable failure.
	pub fn backend(message: impl Display) -> Self {
		Self::Backend { message: message.to_string() }
	}
}

/// Facade over a [`TokenStore`] exposing `get`/`set` semantics for one optional token.
#[derive(Clone)]
pub struct CredentialStore(Arc<dyn TokenStore>);
impl CredentialStore {
	/// Wraps a backend.
	pub fn new(backend: Arc<dyn TokenStore>) -> Self {
		Self(backend)
	}

	/// Returns the current token. Backend read failures are logged and read as absent.
	pub fn get(&self) -> Option<AccessToken> {
		match self.0.load() {
			Ok(token) => token,
			Err(e) => {
				tracing::warn!(error = %e, "Error reading access token; treating it as absent.");

				None
			},
		}
	}

	/// Stores `Some(token)` or deletes the entry on `None`.
	///
	/// Only writes can fail; deletion follows [`CredentialStore::clear`].
	pub fn set(&self, value: Option<AccessToken>) -> Result<(), StoreError> {
		match value {
			Some(token) => self.0.save(&token),
			None => {
				self.clear();

				Ok(())
			},
		}
	}

	/// Deletes the stored token. Failures are logged and swallowed.
	pub fn clear(&self) {
		if let Err(e) = self.0.remove() {
			tracing::warn!(error = %e, "Error removing access token. Ignoring.");
		}
	}

	/// Returns `true` when a token is present.
	pub fn has_token(&self) -> bool {
		self.get().is_some()
	}
}
impl Debug for CredentialStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialStore").finish_non_exhaustive()
	}
}
impl<S> From<Arc<S>> for CredentialStore
where
	S: 'static + TokenStore,
{
	fn from(backend: Arc<S>) -> Self {
		Self(backend)
	}
}
