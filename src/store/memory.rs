//! In-memory token store for tests and ephemeral sessions.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreError, TokenStore},
};

/// Thread-safe in-memory [`TokenStore`]. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<Mutex<Option<AccessToken>>>);
impl MemoryStore {
	/// Creates a store that already holds `token`.
	pub fn with_token(token: impl Into<AccessToken>) -> Self {
		Self(Arc::new(Mutex::new(Some(token.into()))))
	}

	/// Returns the stored token without going through the facade.
	pub fn snapshot(&self) -> Option<AccessToken> {
		self.0.lock().clone()
	}
}
impl TokenStore for MemoryStore {
	fn load(&self) -> Result<Option<AccessToken>, StoreError> {
		Ok(self.snapshot())
	}

	fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
		*self.0.lock() = Some(token.clone());

		Ok(())
	}

	fn remove(&self) -> Result<(), StoreError> {
		self.0.lock().take();

		Ok(())
	}
}
