//! Stress tests for the crit-bit index and the fee-auction batcher.
//!
//! These tests verify:
//! 1. The index stays consistent under heavy insert/pop churn
//! 2. Value is conserved across many mined blocks
//! 3. Determinism is preserved across runs
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use virtual_block::{Account, CritBitTree, FeeAuctionBatcher, FeeRate, Supply};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Operations for the index churn test
const CHURN_OPS: usize = 200_000;

/// Entries submitted in the batcher test
const STRESS_ENTRY_COUNT: usize = 100_000;

/// Entries per block in the batcher test
const ENTRIES_PER_BLOCK: usize = 1_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Generate deterministic `(entry id, bid)` pairs.
///
/// Bids are drawn from a narrow range so that many entries share a bid.
fn generate_deterministic_bids(count: usize, seed: u64) -> Vec<(u64, u64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| (i as u64, rng.gen_range(1..=5_000u64)))
        .collect()
}

/// Run a full auction session and return the hex commitments of every block.
fn run_deterministic_session(seed: u64, count: usize) -> Vec<String> {
    let bids = generate_deterministic_bids(count, seed);

    let mut supply = Supply::new();
    let mut miner = Account::new(1);
    let mut batcher = FeeAuctionBatcher::new(FeeRate::from_rational(3, 10).unwrap(), 2, 0);
    let mut commitments = Vec::new();
    let mut now = 0;

    for chunk in bids.chunks(ENTRIES_PER_BLOCK) {
        for &(id, bid) in chunk {
            batcher.add_entry(id, supply.increase(bid).unwrap()).unwrap();
        }
        now += 2;
        let block = batcher.mine(&mut miner, now).unwrap();
        commitments.push(hex::encode(block.commitment()));
    }

    commitments
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Random insert/pop churn checked against a `BTreeMap`.
#[test]
fn stress_index_churn() {
    println!("\n=== STRESS TEST: Index Churn ===\n");

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut tree = CritBitTree::with_capacity(CHURN_OPS);
    let mut model = BTreeMap::new();

    let start = Instant::now();
    for i in 0..CHURN_OPS {
        // Keys cluster in a small range to force duplicates and pops
        let key = u128::from(rng.gen_range(0..50_000u64)) << rng.gen_range(0..64u32);

        if rng.gen_bool(0.6) {
            // Duplicates are rejected and keep the old value
            let fresh = !model.contains_key(&key);
            if fresh {
                model.insert(key, i);
            }
            assert_eq!(tree.insert(key, i).is_ok(), fresh);
        } else {
            assert_eq!(tree.pop(key).ok(), model.remove(&key));
        }
    }
    let elapsed = start.elapsed();

    println!("  Operations:        {:>12}", CHURN_OPS);
    println!("  Final size:        {:>12}", tree.len());
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert_eq!(tree.len(), model.len());
    let keys: Vec<u128> = tree.iter().map(|(k, _)| k).collect();
    let expected: Vec<u128> = model.keys().copied().collect();
    assert_eq!(keys, expected);
    assert_eq!(tree.max_key().ok(), model.keys().next_back().copied());
    assert_eq!(tree.min_key().ok(), model.keys().next().copied());

    // Drain in descending order
    while let Some((key, _)) = tree.pop_max() {
        assert_eq!(model.pop_last().map(|(k, _)| k), Some(key));
    }
    assert!(tree.destroy_empty().is_ok());

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Many blocks through the batcher with full value accounting.
#[test]
fn stress_batcher_conservation() {
    println!("\n=== STRESS TEST: Batcher Conservation ===\n");

    let bids = generate_deterministic_bids(STRESS_ENTRY_COUNT, 7);
    let total_bid: u64 = bids.iter().map(|&(_, bid)| bid).sum();

    let mut supply = Supply::new();
    let mut miner = Account::new(1);
    let mut batcher = FeeAuctionBatcher::new(FeeRate::from_rational(1, 4).unwrap(), 1, 0);

    let start = Instant::now();
    let mut now = 0;
    let mut consumed = 0usize;
    for chunk in bids.chunks(ENTRIES_PER_BLOCK) {
        for &(id, bid) in chunk {
            batcher.add_entry(id, supply.increase(bid).unwrap()).unwrap();
        }
        now += 1;
        let block = batcher.mine(&mut miner, now).unwrap();

        let mut last_bid = u128::MAX;
        for (bid, _) in block.into_highest_first() {
            assert!(bid <= last_bid, "block not drained highest first");
            last_bid = bid;
            consumed += 1;
        }

        let receipt = batcher.last_receipt().unwrap();
        assert!(receipt.is_balanced());
    }
    let elapsed = start.elapsed();

    let fees = batcher.extract_fees();

    println!("  Entries consumed:  {:>12}", consumed);
    println!("  Blocks mined:      {:>12}", batcher.height());
    println!("  Miner total:       {:>12}", miner.total());
    println!("  Fees extracted:    {:>12}", fees.value());
    println!("  Elapsed time:      {:>12.2?}", elapsed);

    assert_eq!(consumed, STRESS_ENTRY_COUNT);
    assert_eq!(batcher.height(), (STRESS_ENTRY_COUNT / ENTRIES_PER_BLOCK) as u64);
    assert_eq!(miner.total() + u128::from(fees.value()), u128::from(total_bid));

    supply.decrease(fees);
    for coin in miner.take_all() {
        supply.decrease(coin);
    }
    assert_eq!(supply.outstanding(), 0);

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same bid sequence produces identical block commitments.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: usize = 10_000;
    const SEED: u64 = 12345;

    let run1 = run_deterministic_session(SEED, TEST_COUNT);
    let run2 = run_deterministic_session(SEED, TEST_COUNT);

    println!("  Blocks:            {:>12}", run1.len());
    println!("  First commitment:  {}", run1[0]);

    assert_eq!(run1, run2, "Commitments differ between identical runs");

    let other = run_deterministic_session(SEED + 1, TEST_COUNT);
    assert_ne!(run1, other, "Different seeds should produce different blocks");

    println!("\n=== DETERMINISM TEST PASSED ===\n");
}
