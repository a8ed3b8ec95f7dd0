use crate::encoding::render_float;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Literal payload of the genesis block.
pub const GENESIS_DATA: &str = "Genesis Block";

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Seconds since the Unix epoch with microsecond resolution.
pub fn current_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockData {
    Genesis,
    Transactions(Vec<Transaction>),
}

impl BlockData {
    /// Canonical text fed into the block hash: the genesis marker, or the
    /// transactions as a list of dicts.
    pub fn render(&self) -> String {
        match self {
            BlockData::Genesis => GENESIS_DATA.to_string(),
            BlockData::Transactions(txs) => {
                let items: Vec<String> = txs.iter().map(Transaction::render).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match self {
            BlockData::Genesis => &[],
            BlockData::Transactions(txs) => txs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: f64,
    data: BlockData,
    previous_hash: String,
    nonce: u64,
    hash: String,
}

impl Block {
    /// Builds an unmined block with nonce 0 and its hash already computed.
    pub fn new(
        index: u64,
        timestamp: f64,
        data: BlockData,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp,
            data,
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: String::new(),
        };
        block.recompute_hash();
        block
    }

    /// Index 0, parent `"0"`, the literal genesis payload. Never mined.
    pub fn genesis(timestamp: f64) -> Self {
        Block::new(0, timestamp, BlockData::Genesis, GENESIS_PREVIOUS_HASH)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    /// Transactions carried by the block; empty for genesis.
    pub fn transactions(&self) -> &[Transaction] {
        self.data.transactions()
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && matches!(self.data, BlockData::Genesis)
    }

    /// The exact string that gets hashed:
    /// `index ‖ timestamp ‖ data ‖ previous_hash ‖ nonce`.
    pub fn hash_input(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.index,
            render_float(self.timestamp),
            self.data.render(),
            self.previous_hash,
            self.nonce
        )
    }

    /// SHA-256 of [`Block::hash_input`] as lowercase hex. Pure.
    pub fn compute_hash(&self) -> String {
        hex::encode(Sha256::digest(self.hash_input().as_bytes()))
    }

    /// Stores `compute_hash()` as the block hash. Idempotent.
    pub fn recompute_hash(&mut self) -> &str {
        self.hash = self.compute_hash();
        &self.hash
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub(crate) fn increment_nonce(&mut self) {
        self.nonce += 1;
    }

    /// Discards whatever position and parent the caller put in and places the
    /// block at `index` on top of `previous_hash`.
    pub(crate) fn link_to(&mut self, index: u64, previous_hash: &str) {
        self.index = index;
        self.previous_hash = previous_hash.to_string();
        self.recompute_hash();
    }

    #[cfg(test)]
    pub(crate) fn data_mut(&mut self) -> &mut BlockData {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_computed_at_construction() {
        let block = Block::new(3, 1700000000.25, BlockData::Genesis, "abc");
        assert_eq!(block.nonce(), 0);
        assert_eq!(block.hash(), block.compute_hash());
        assert_eq!(block.hash().len(), 64);
        assert!(block
            .hash()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_genesis_hash_input() {
        let block = Block::genesis(1700000000.0);
        assert_eq!(block.hash_input(), "01700000000.0Genesis Block00");
        assert!(block.is_genesis());
    }

    #[test]
    fn test_known_hash() {
        let block = Block::genesis(1700000000.0);
        let expected = hex::encode(Sha256::digest(b"01700000000.0Genesis Block00"));
        assert_eq!(block.hash(), expected);
    }

    #[test]
    fn test_transaction_hash_input() {
        let txs = vec![
            Transaction::new("s1", "r1", 5, "sig1"),
            Transaction::new("s2", "r2", 6, "sig2"),
        ];
        let block = Block::new(1, 1.5, BlockData::Transactions(txs), "ff");
        assert_eq!(
            block.hash_input(),
            "11.5[{'sender': 's1', 'receiver': 'r1', 'amount': 5, 'signature': 'sig1'}, \
             {'sender': 's2', 'receiver': 'r2', 'amount': 6, 'signature': 'sig2'}]ff0"
        );
        assert_eq!(block.transactions().len(), 2);
    }

    #[test]
    fn test_empty_transaction_list_renders_brackets() {
        assert_eq!(BlockData::Transactions(vec![]).render(), "[]");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut block = Block::new(1, 2.0, BlockData::Genesis, "0");
        let first = block.recompute_hash().to_string();
        let second = block.recompute_hash().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nonce_changes_hash() {
        let mut block = Block::new(1, 2.0, BlockData::Genesis, "0");
        let before = block.hash().to_string();
        block.increment_nonce();
        assert_eq!(block.hash(), before);
        assert_ne!(block.compute_hash(), before);
        block.recompute_hash();
        assert_ne!(block.hash(), before);
    }

    #[test]
    fn test_link_to_overwrites_previous_hash() {
        let mut block = Block::new(0, 2.0, BlockData::Genesis, "caller supplied");
        block.link_to(4, "parent");
        assert_eq!(block.index(), 4);
        assert_eq!(block.previous_hash(), "parent");
        assert!(!block.is_genesis());
        assert_eq!(block.hash(), block.compute_hash());
    }
}
