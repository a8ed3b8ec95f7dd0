//! Signed transfers and the message their signature covers

use crate::crypto::{self, MessageHash};
use crate::encoding::render_str;
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};

/// Text that gets hashed and signed: `sender ‖ receiver ‖ amount`.
///
/// There is no delimiter, so `("AB", "C")` and `("A", "BC")` produce the same
/// message. Existing signatures depend on this layout.
pub fn signing_message(sender: &str, receiver: &str, amount: u64) -> String {
    format!("{}{}{}", sender, receiver, amount)
}

/// SHA-256 of [`signing_message`]; what the sender's signature covers.
pub fn message_hash(sender: &str, receiver: &str, amount: u64) -> MessageHash {
    crypto::hash_message(signing_message(sender, receiver, amount).as_bytes())
}

/// Receivers are not parsed as keys, but they end up in block hashes, so only
/// ASCII is accepted.
pub fn check_receiver(receiver: &str) -> Result<()> {
    if let Some(c) = receiver.chars().find(|c| !c.is_ascii()) {
        return Err(ChainError::MalformedInput(format!(
            "Receiver must be ASCII, found {:?}",
            c
        )));
    }
    Ok(())
}

/// A transfer of `amount` from `sender` to `receiver`, both public keys in
/// 128-character hex form, authorized by a DER/hex signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    pub signature: String,
}

impl Transaction {
    /// Wraps the four fields as given; nothing is checked here.
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        signature: impl Into<String>,
    ) -> Self {
        Transaction {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            signature: signature.into(),
        }
    }

    /// Digest of this transaction's signing message.
    pub fn message_hash(&self) -> MessageHash {
        message_hash(&self.sender, &self.receiver, self.amount)
    }

    /// Checks the signature against the sender's key.
    pub fn verify(&self) -> Result<()> {
        crypto::verify_signature(&self.sender, &self.message_hash(), &self.signature)
    }

    /// Dict-style rendering used in block hashes, fields in declaration order.
    pub fn render(&self) -> String {
        format!(
            "{{'sender': {}, 'receiver': {}, 'amount': {}, 'signature': {}}}",
            render_str(&self.sender),
            render_str(&self.receiver),
            self.amount,
            render_str(&self.signature)
        )
    }
}
