//! Proof-of-work search over the block nonce

use crate::blockchain::Block;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// True when `hash` starts with `difficulty` literal `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Resets the nonce to 0 and increments it until the block hash meets
/// `difficulty`. Blocks the calling thread; expected work is about
/// `16^difficulty` hashes and there is no upper bound.
pub fn mine(block: &mut Block, difficulty: usize) -> String {
    let never = AtomicBool::new(false);
    // Without a cancel signal the search only ends on success.
    mine_with_cancel(block, difficulty, &never).unwrap_or_default()
}

/// Same search as [`mine`], but gives up and returns `None` once `cancel` is
/// set, e.g. when a competing block for the same parent has been accepted.
/// The block is left with whatever nonce was last tried.
pub fn mine_with_cancel(block: &mut Block, difficulty: usize, cancel: &AtomicBool) -> Option<String> {
    block.set_nonce(0);
    block.recompute_hash();

    while !meets_difficulty(block.hash(), difficulty) {
        if cancel.load(Ordering::Relaxed) {
            debug!(
                "Mining of block {} cancelled at nonce {}",
                block.index(),
                block.nonce()
            );
            return None;
        }
        block.increment_nonce();
        block.recompute_hash();
    }

    debug!(
        "Mined block {} with nonce {} ({})",
        block.index(),
        block.nonce(),
        block.hash()
    );
    Some(block.hash().to_string())
}
