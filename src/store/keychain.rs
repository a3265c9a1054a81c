//! OS keychain-backed token store built on `keyring`.

// crates.io
use keyring::Entry;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreError, TokenStore},
};

/// Keychain service identifier the token is filed under.
pub const DEFAULT_SERVICE: &str = "com.flatironschool.soundcloudsample";
/// Keychain account (key) name holding the token.
pub const DEFAULT_ACCOUNT: &str = "access_token";

/// [`TokenStore`] persisting the token as one keychain entry.
///
/// The entry handle is created once and reused, so backends that keep state per
/// handle (such as the `keyring` mock) observe every write.
pub struct KeychainStore {
	service: String,
	account: String,
	entry: Entry,
}
impl KeychainStore {
	/// Opens the entry for `service`/`account`.
	pub fn new(service: impl Into<String>, account: impl Into<String>) -> Result<Self, StoreError> {
		let service = service.into();
		let account = account.into();
		let entry = Entry::new(&service, &account).map_err(StoreError::backend)?;

		Ok(Self { service, account, entry })
	}

	/// Opens the entry under [`DEFAULT_SERVICE`]/[`DEFAULT_ACCOUNT`].
	pub fn open_default() -> Result<Self, StoreError> {
		Self::new(DEFAULT_SERVICE, DEFAULT_ACCOUNT)
	}

	/// Keychain service identifier.
	pub fn service(&self) -> &str {
		&self.service
	}

	/// Keychain account name.
	pub fn account(&self) -> &str {
		&self.account
	}
}
impl TokenStore for KeychainStore {
	fn load(&self) -> Result<Option<AccessToken>, StoreError> {
		match self.entry.get_password() {
			Ok(token) => Ok(Some(AccessToken::new(token))),
			Err(keyring::Error::NoEntry) => Ok(None),
			Err(e) => Err(StoreError::backend(e)),
		}
	}

	fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
		self.entry.set_password(token.expose()).map_err(StoreError::backend)
	}

	fn remove(&self) -> Result<(), StoreError> {
		match self.entry.delete_credential() {
			Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
			Err(e) => Err(StoreError::backend(e)),
		}
	}
}
impl Debug for KeychainStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeychainStore")
			.field("service", &self.service)
			.field("account", &self.account)
			.finish()
	}
}
