use crate::blockchain::block::{current_timestamp, Block, BlockData};
use crate::config::ChainConfig;
use crate::crypto;
use crate::error::Result;
use crate::mempool::Mempool;
use crate::miner;
use crate::transaction::{self, Transaction};
use tracing::{debug, info, warn};

/// What happened to a transaction that passed signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Buffered; `pending` transactions are now waiting.
    Pending { pending: usize },
    /// The buffer hit the flush threshold and was mined into block `index`.
    Mined { index: u64, hash: String },
}

/// Append-only chain of blocks plus the buffer of verified transactions
/// waiting for the next block.
///
/// The genesis block is held apart from the rest so the chain can never be
/// empty.
#[derive(Debug, Clone)]
pub struct Blockchain {
    genesis: Block,
    blocks: Vec<Block>,
    pending: Mempool,
    config: ChainConfig,
}

impl Blockchain {
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let genesis = Self::create_genesis_block();
        info!(
            "Created chain (difficulty = {}, flush threshold = {}), genesis {}",
            config.difficulty,
            config.flush_threshold,
            genesis.hash()
        );

        Ok(Blockchain {
            genesis,
            blocks: Vec::new(),
            pending: Mempool::new(),
            config,
        })
    }

    /// The genesis block is not mined: nonce stays 0.
    fn create_genesis_block() -> Block {
        Block::genesis(current_timestamp())
    }

    /// Settings this chain was created with.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Leading `'0'` hex characters required of every mined block.
    pub fn difficulty(&self) -> usize {
        self.config.difficulty
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len() + 1
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The unmined first block.
    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    /// Block at `index`, genesis being 0.
    pub fn get(&self, index: usize) -> Option<&Block> {
        match index {
            0 => Some(&self.genesis),
            i => self.blocks.get(i - 1),
        }
    }

    /// Blocks in chain order, starting with genesis.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        std::iter::once(&self.genesis).chain(self.blocks.iter())
    }

    /// Tip of the chain; genesis until the first block is mined.
    pub fn last_block(&self) -> &Block {
        self.blocks.last().unwrap_or(&self.genesis)
    }

    /// Verified transactions waiting for the next block, in arrival order.
    pub fn pending(&self) -> &[Transaction] {
        self.pending.transactions()
    }

    /// Mines `block` at this chain's difficulty and returns the winning hash.
    pub fn proof_of_work(&self, block: &mut Block) -> String {
        miner::mine(block, self.config.difficulty)
    }

    /// Links `block` to the current tip, mines it and appends it. This is the
    /// only way a block joins the chain; whatever `index` and `previous_hash`
    /// the caller set are replaced.
    pub fn add_block(&mut self, mut block: Block) -> &Block {
        let tip_hash = self.last_block().hash().to_string();
        block.link_to(self.len() as u64, &tip_hash);
        self.proof_of_work(&mut block);

        info!(
            "Appended block {} ({} transactions, nonce {}): {}",
            block.index(),
            block.transactions().len(),
            block.nonce(),
            block.hash()
        );
        self.blocks.push(block);
        self.last_block()
    }

    /// Verifies the sender's signature over `sender ‖ receiver ‖ amount` and
    /// buffers the transaction. Once the buffer reaches the flush threshold
    /// the whole buffer is mined into a new block.
    ///
    /// A failed check leaves the chain and the buffer untouched.
    pub fn add_transaction(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: u64,
        signature: &str,
    ) -> Result<Admission> {
        if let Err(e) = transaction::check_receiver(receiver) {
            warn!("Rejected transaction of {} from {}: {}", amount, sender, e);
            return Err(e);
        }

        let msg_hash = transaction::message_hash(sender, receiver, amount);

        if let Err(e) = crypto::verify_signature(sender, &msg_hash, signature) {
            warn!("Rejected transaction of {} from {}: {}", amount, sender, e);
            return Err(e);
        }

        let pending = self
            .pending
            .push(Transaction::new(sender, receiver, amount, signature));
        debug!("Accepted transaction of {} ({} pending)", amount, pending);

        if pending >= self.config.flush_threshold {
            let block = self.flush_pending();
            return Ok(Admission::Mined {
                index: block.index(),
                hash: block.hash().to_string(),
            });
        }

        Ok(Admission::Pending { pending })
    }

    /// Signs the transfer with `private_key_hex`, checks the signature against
    /// `sender` before submitting it, then goes through [`add_transaction`].
    ///
    /// [`add_transaction`]: Blockchain::add_transaction
    pub fn make_transaction(
        &mut self,
        private_key_hex: &str,
        sender: &str,
        receiver: &str,
        amount: u64,
    ) -> Result<Admission> {
        let message = transaction::signing_message(sender, receiver, amount);
        let (msg_hash, signature) = crypto::sign(private_key_hex, message.as_bytes())?;

        // Redundant with add_transaction; catches a key that does not match `sender`
        // before anything is submitted.
        if let Err(e) = crypto::verify_signature(sender, &msg_hash, &signature) {
            warn!("Signed transaction does not verify for {}: {}", sender, e);
            return Err(e);
        }

        self.add_transaction(sender, receiver, amount, &signature)
    }

    fn flush_pending(&mut self) -> &Block {
        let transactions = self.pending.drain_all();
        let block = Block::new(
            self.len() as u64,
            current_timestamp(),
            BlockData::Transactions(transactions),
            self.last_block().hash(),
        );
        self.add_block(block)
    }

    #[cfg(test)]
    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        match index {
            0 => Some(&mut self.genesis),
            i => self.blocks.get_mut(i - 1),
        }
    }
}
