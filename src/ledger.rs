//! Shared handle around a [`Blockchain`].
//!
//! Admission, flush, mining and append all run while one lock is held, so the
//! read of the tip, the proof-of-work search and the push cannot interleave
//! with another writer. Cloning the handle is all it takes to hand the ledger
//! to another thread.

use crate::blockchain::{Admission, Blockchain};
use crate::config::ChainConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Arc<Mutex<Blockchain>>,
}

impl Ledger {
    pub fn new(config: ChainConfig) -> Result<Self> {
        Ok(Self::from_chain(Blockchain::new(config)?))
    }

    pub fn from_chain(chain: Blockchain) -> Self {
        Ledger {
            chain: Arc::new(Mutex::new(chain)),
        }
    }

    pub fn add_transaction(
        &self,
        sender: &str,
        receiver: &str,
        amount: u64,
        signature: &str,
    ) -> Result<Admission> {
        self.chain
            .lock()
            .add_transaction(sender, receiver, amount, signature)
    }

    pub fn make_transaction(
        &self,
        private_key_hex: &str,
        sender: &str,
        receiver: &str,
        amount: u64,
    ) -> Result<Admission> {
        self.chain
            .lock()
            .make_transaction(private_key_hex, sender, receiver, amount)
    }

    pub fn is_chain_valid(&self) -> bool {
        self.chain.lock().is_chain_valid()
    }

    pub fn len(&self) -> usize {
        self.chain.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.lock().is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.chain.lock().pending().len()
    }

    /// Runs `f` against the chain while holding the lock.
    pub fn with_chain<R>(&self, f: impl FnOnce(&Blockchain) -> R) -> R {
        f(&self.chain.lock())
    }

    /// A point-in-time copy of the chain.
    pub fn snapshot(&self) -> Blockchain {
        self.chain.lock().clone()
    }
}
