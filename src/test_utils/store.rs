use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    Error, NewTransaction, NewUser, TransactionStore, User, UserID, UserStore,
    transaction::{Transaction, TransactionChanges, TransactionId},
    user::UserChanges,
};

/// Wraps a [TransactionStore] and counts the calls made to it.
pub(crate) struct CountingTransactionStore {
    inner: Arc<dyn TransactionStore>,
    calls: AtomicUsize,
}

impl CountingTransactionStore {
    pub(crate) fn new(inner: Arc<dyn TransactionStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl TransactionStore for CountingTransactionStore {
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        self.count();
        self.inner.create(transaction)
    }

    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        self.count();
        self.inner.get_all()
    }

    fn update(&self, id: TransactionId, changes: TransactionChanges) -> Result<Transaction, Error> {
        self.count();
        self.inner.update(id, changes)
    }

    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.count();
        self.inner.delete(id)
    }
}

/// Wraps a [UserStore] and counts the calls made to it.
pub(crate) struct CountingUserStore {
    inner: Arc<dyn UserStore>,
    calls: AtomicUsize,
}

impl CountingUserStore {
    pub(crate) fn new(inner: Arc<dyn UserStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl UserStore for CountingUserStore {
    fn create(&self, user: NewUser) -> Result<User, Error> {
        self.count();
        self.inner.create(user)
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        self.count();
        self.inner.get(id)
    }

    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        self.count();
        self.inner.get_by_email(email)
    }

    fn get_all(&self) -> Result<Vec<User>, Error> {
        self.count();
        self.inner.get_all()
    }

    fn update(&self, id: UserID, changes: UserChanges) -> Result<User, Error> {
        self.count();
        self.inner.update(id, changes)
    }
}
