use parking_lot::RwLock;

use crate::account::Account;

/// Holds zero or one [`Account`] for the lifetime of the process.
///
/// Touched only by the dispatcher under its semaphore (see [`crate::dispatcher::EventDispatcher`]);
/// the internal lock exists for consistency with the window's locking discipline and as a guard
/// against future callers that bypass the semaphore, not because concurrent access is expected.
#[derive(Debug, Default)]
pub struct AccountStore {
    account: RwLock<Option<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored account, if any.
    pub fn get(&self) -> Option<Account> {
        *self.account.read()
    }

    /// Installs `account`, replacing whatever was there before, and returns it back.
    pub fn put(&self, account: Account) -> Account {
        *self.account.write() = Some(account);
        account
    }
}
