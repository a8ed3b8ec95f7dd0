//! minichain - a single-writer proof-of-work ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Blockchain
//! - [`blockchain`] - Block structure, chain management and validation
//! - [`transaction`] - Transaction type and the signed message layout
//! - [`mempool`] - Pending transaction buffer
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work mining
//!
//! ## Cryptography
//! - [`crypto`] - Signatures, verification and addresses (secp256k1)
//! - [`encoding`] - Canonical text rendering for block hashes
//!
//! ## Concurrency
//! - [`ledger`] - Lock-guarded shared handle to a chain
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Blockchain
// ============================================================================
pub mod blockchain;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;
pub mod encoding;

// ============================================================================
// Concurrency
// ============================================================================
pub mod ledger;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use blockchain::{Admission, Block, BlockData, Blockchain};
pub use config::ChainConfig;
pub use crypto::KeyPair;
pub use error::{ChainError, Result};
pub use ledger::Ledger;
pub use transaction::Transaction;
