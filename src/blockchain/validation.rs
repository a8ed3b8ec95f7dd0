use crate::blockchain::block::Block;
use crate::blockchain::chain::Blockchain;
use crate::error::{ChainError, Result};

/// Checks `block` against its predecessor: stored hash must equal the
/// recomputed hash, and `previous_hash` must equal the predecessor's hash.
pub fn validate_link(previous: &Block, block: &Block) -> Result<()> {
    let computed = block.compute_hash();
    if block.hash() != computed {
        return Err(ChainError::InvalidBlock(format!(
            "Block {} hash mismatch. Stored {}, but recomputed {}.",
            block.index(),
            block.hash(),
            computed
        )));
    }

    if block.previous_hash() != previous.hash() {
        return Err(ChainError::InvalidBlock(format!(
            "Block {} does not link to its predecessor. Expected previous hash {}, but got {}.",
            block.index(),
            previous.hash(),
            block.previous_hash()
        )));
    }

    Ok(())
}

/// Single forward pass from the second block on; stops at the first fault.
///
/// The first block is trusted as-is: its own hash is not recomputed. Signatures
/// of transactions already inside blocks are not re-checked either.
pub fn validate_blocks<'a, I>(blocks: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut blocks = blocks.into_iter();
    let Some(mut previous) = blocks.next() else {
        return Ok(());
    };
    for block in blocks {
        validate_link(previous, block)?;
        previous = block;
    }
    Ok(())
}

impl Blockchain {
    /// Reports the first block that breaks hash integrity or linkage.
    pub fn validate_chain(&self) -> Result<()> {
        validate_blocks(self.blocks())
    }

    /// Boolean form of [`Blockchain::validate_chain`].
    pub fn is_chain_valid(&self) -> bool {
        self.validate_chain().is_ok()
    }
}
