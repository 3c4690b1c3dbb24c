//! Virtual Block - Binary Entry Point
//!
//! Runs a short fee-auction session and prints what each close settled.
//!
//! ```text
//! virtual-block [CONFIG.toml]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::error::Error;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use virtual_block::{Account, BatcherConfig, Clock, FeeAuctionBatcher, ManualClock, Supply};

fn init_logging() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => BatcherConfig::from_file(&path)?,
        None => BatcherConfig::default(),
    };

    println!("===========================================");
    println!("  Virtual Block - Fee Auction");
    println!("===========================================");
    println!("  Fee rate:       {}", config.fee_rate);
    println!("  Block duration: {}", config.block_duration);
    println!();

    let clock = ManualClock::new(0);
    let mut supply = Supply::new();
    let mut miner = Account::new(1);
    let mut batcher = FeeAuctionBatcher::from_config(&config, clock.now());

    let rounds: [&[(&str, u64)]; 2] = [
        &[("swap-a", 500), ("swap-b", 100), ("swap-c", 250), ("swap-d", 150)],
        &[("mint-e", 40), ("mint-f", 40), ("burn-g", 90)],
    ];

    for bids in rounds {
        for &(entry, amount) in bids {
            batcher
                .add_entry(entry, supply.increase(amount)?)
                .map_err(|rejected| rejected.error)?;
        }

        clock.set(batcher.ready_at());
        let block = batcher.mine_with_clock(&mut miner, &clock)?;

        if let Some(receipt) = batcher.last_receipt() {
            println!("Block {} closed at {}", receipt.height, receipt.close_time);
            println!("  Bids:         {}", receipt.bid_total);
            println!("  Miner fee:    {}", receipt.miner_fee);
            println!("  Protocol fee: {}", receipt.protocol_fee);
            println!("  Commitment:   {}", receipt.commitment_hex());
            match receipt.digest_hex() {
                Ok(digest) => println!("  Digest:       {}", digest),
                Err(e) => println!("  ERROR: Failed to serialize receipt: {:?}", e),
            }
        }

        println!("  Execution order:");
        for (bid, entry) in block.into_highest_first() {
            println!("    {:>6}  {}", bid, entry);
        }
        println!();
    }

    let fees = batcher.extract_fees();
    println!("Miner received:  {}", miner.total());
    println!("Fees extracted:  {}", fees.value());

    supply.decrease(fees);
    for coin in miner.take_all() {
        supply.decrease(coin);
    }
    println!("Outstanding supply after burn: {}", supply.outstanding());

    Ok(())
}
