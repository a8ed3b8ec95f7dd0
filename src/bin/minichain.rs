#![forbid(unsafe_code)]
use clap::{Parser, Subcommand};
use minichain::crypto::{address_from_pubkey, generate_keypair};
use minichain::{Admission, Block, ChainConfig, KeyPair, Ledger};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a wallet and prints its keys and address
    Keygen,
    /// Derives the display address of a 128-character public key
    Address {
        public_key: String,
    },
    /// Sends signed transfers between two fresh wallets and prints the chain
    Demo {
        /// Number of transfers to submit
        #[arg(long, default_value_t = 10)]
        transactions: u64,
        /// Leading zero hex characters required of mined hashes
        #[arg(long)]
        difficulty: Option<usize>,
        /// Pending transactions that trigger mining
        #[arg(long)]
        threshold: Option<usize>,
        /// TOML file with `difficulty` and `flush_threshold`
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the chain as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => {
            let (private_key, public_key) = generate_keypair();
            println!("Private key: {}", private_key);
            println!("Public key:  {}", public_key);
            println!("Address:     {}", address_from_pubkey(&public_key)?);
        }
        Commands::Address { public_key } => {
            println!("{}", address_from_pubkey(&public_key)?);
        }
        Commands::Demo {
            transactions,
            difficulty,
            threshold,
            config,
            json,
        } => {
            let mut chain_config = match config {
                Some(path) => ChainConfig::load(path)?,
                None => ChainConfig::default(),
            };
            if let Some(difficulty) = difficulty {
                chain_config.difficulty = difficulty;
            }
            if let Some(threshold) = threshold {
                chain_config.flush_threshold = threshold;
            }
            demo(chain_config, transactions, json)?;
        }
    }

    Ok(())
}

fn demo(config: ChainConfig, transactions: u64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Ledger::new(config)?;
    let alice = KeyPair::generate();
    let bob = KeyPair::generate();

    println!("Alice: {}", alice.address());
    println!("Bob:   {}", bob.address());

    let start_time = Instant::now();
    for amount in 1..=transactions {
        let (from, to) = if amount % 2 == 1 { (&alice, &bob) } else { (&bob, &alice) };
        let admission = ledger.make_transaction(
            &from.private_key_hex(),
            &from.public_key_hex(),
            &to.public_key_hex(),
            amount,
        )?;
        if let Admission::Mined { index, hash } = admission {
            info!("Block {} mined: {}", index, hash);
        }
    }
    let elapsed = start_time.elapsed();

    let chain = ledger.snapshot();
    if json {
        let blocks: Vec<&Block> = chain.blocks().collect();
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    } else {
        for block in chain.blocks() {
            println!(
                "#{:<4} nonce {:<8} txs {:<3} {}",
                block.index(),
                block.nonce(),
                block.transactions().len(),
                block.hash()
            );
        }
    }

    println!();
    println!("Blocks:      {}", chain.len());
    println!("Pending:     {}", chain.pending().len());
    println!("Valid:       {}", chain.is_chain_valid());
    println!("Mining time: {:.3} seconds", elapsed.as_secs_f64());
    Ok(())
}
