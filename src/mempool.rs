//! Pending transactions awaiting inclusion in the next block

use crate::transaction::Transaction;

/// Ordered buffer of verified transactions. Only the chain pushes into it,
/// after the signature check has passed.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `tx` and returns the new pool size.
    pub fn push(&mut self, tx: Transaction) -> usize {
        self.transactions.push(tx);
        self.transactions.len()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Pending transactions in arrival order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Takes every pending transaction in arrival order, leaving the pool empty.
    pub fn drain_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain_keep_order() {
        let mut pool = Mempool::new();
        assert!(pool.is_empty());

        assert_eq!(pool.push(Transaction::new("a", "b", 1, "s1")), 1);
        assert_eq!(pool.push(Transaction::new("a", "b", 2, "s2")), 2);
        assert_eq!(pool.transactions()[1].amount, 2);

        let drained = pool.drain_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].amount, 1);
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }
}
