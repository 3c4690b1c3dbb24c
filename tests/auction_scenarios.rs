//! End-to-end fee auction scenarios through the public API.

use virtual_block::{
    Account, AuctionError, Balance, BatcherConfig, Block, Clock, FeeAuctionBatcher, FeeRate,
    ManualClock, Recipient, Supply,
};

/// Transaction-like entry used by the scenarios
#[derive(Debug, Clone, PartialEq, Eq)]
struct Tx {
    sender: u64,
    nonce: u64,
}

fn tx(sender: u64, nonce: u64) -> Tx {
    Tx { sender, nonce }
}

/// Recipient that tallies what it receives
#[derive(Default)]
struct Counter {
    received: u64,
    coins: Vec<Balance>,
}

impl Recipient for Counter {
    fn receive(&mut self, value: Balance) {
        self.received += value.value();
        self.coins.push(value);
    }
}

#[test]
fn test_config_driven_session() {
    let config = BatcherConfig::from_toml_str(
        r#"
        fee_rate = "0.25"
        block_duration = 5
        "#,
    )
    .unwrap();

    let clock = ManualClock::new(100);
    let mut supply = Supply::new();
    let mut miner = Account::new(7);
    let mut batcher = FeeAuctionBatcher::from_config(&config, clock.now());

    batcher.add_entry(tx(1, 0), supply.increase(500).unwrap()).unwrap();
    batcher.add_entry(tx(2, 0), supply.increase(100).unwrap()).unwrap();
    batcher.add_entry(tx(1, 1), supply.increase(250).unwrap()).unwrap();
    batcher.add_entry(tx(3, 0), supply.increase(150).unwrap()).unwrap();

    clock.advance(3);
    assert_eq!(
        batcher.mine_with_clock(&mut miner, &clock).unwrap_err(),
        AuctionError::BlockNotReady { now: 103, ready_at: 105 }
    );

    clock.advance(2);
    let block = batcher.mine_with_clock(&mut miner, &clock).unwrap();

    let order: Vec<Tx> = block.into_highest_first().map(|(_, tx)| tx).collect();
    assert_eq!(order, vec![tx(1, 0), tx(1, 1), tx(3, 0), tx(2, 0)]);

    assert_eq!(miner.total(), 250);
    assert_eq!(batcher.extract_fees().value(), 750);
    assert_eq!(batcher.last_block_close_time(), 105);
}

#[test]
fn test_custom_recipient() {
    let mut supply = Supply::new();
    let mut counter = Counter::default();
    let mut batcher = FeeAuctionBatcher::new(FeeRate::ONE, 1, 0);

    batcher.add_entry("only", supply.increase(42).unwrap()).unwrap();
    batcher.mine(&mut counter, 1).unwrap();

    assert_eq!(counter.received, 42);
    assert_eq!(batcher.collected_fees(), 0);

    for coin in counter.coins.drain(..) {
        supply.decrease(coin);
    }
    assert_eq!(supply.outstanding(), 0);
}

#[test]
fn test_dyn_recipient() {
    let mut supply = Supply::new();
    let mut account = Account::new(3);
    let miner: &mut dyn Recipient = &mut account;
    let mut batcher = FeeAuctionBatcher::new(FeeRate::from_rational(1, 2).unwrap(), 1, 0);

    batcher.add_entry(0u8, supply.increase(9).unwrap()).unwrap();
    batcher.mine(miner, 1).unwrap();

    // floor(9 / 2)
    assert_eq!(account.total(), 4);
    assert_eq!(batcher.collected_fees(), 5);
}

#[test]
fn test_partial_consumption_keeps_rest() {
    let mut supply = Supply::new();
    let mut batcher = FeeAuctionBatcher::new(FeeRate::ZERO, 1, 0);
    for (entry, bid) in [("a", 3), ("b", 9), ("c", 9), ("d", 1)] {
        batcher.add_entry(entry, supply.increase(bid).unwrap()).unwrap();
    }

    let mut block: Block<&str> = batcher.mine(&mut Account::new(1), 1).unwrap();
    assert_eq!(block.pop_highest(), Some((9, vec!["b", "c"])));

    // Remaining levels are still ordered and intact
    assert_eq!(block.entry_count(), 2);
    assert_eq!(block.highest_bid(), Some(3));
    assert_eq!(block.index().next_key(1), Ok(Some(3)));
    assert_eq!(block.index().previous_key(1), Ok(None));
}

#[test]
fn test_receipts_chain_over_blocks() {
    let mut supply = Supply::new();
    let mut miner = Account::new(1);
    let mut batcher = FeeAuctionBatcher::new(FeeRate::from_rational(1, 10).unwrap(), 10, 0);

    let mut digests = Vec::new();
    for round in 1..=3u64 {
        for i in 0..round {
            batcher
                .add_entry((round, i), supply.increase(100 * round).unwrap())
                .unwrap();
        }
        batcher.mine(&mut miner, round * 10).unwrap();

        let receipt = batcher.last_receipt().unwrap();
        assert_eq!(receipt.height, round);
        assert_eq!(receipt.entry_count, round);
        assert_eq!(receipt.bid_levels, 1);
        assert!(receipt.is_balanced());
        digests.push(receipt.digest_hex().unwrap());
    }

    digests.dedup();
    assert_eq!(digests.len(), 3);
    assert_eq!(batcher.height(), 3);
}

#[test]
fn test_rejected_entry_can_be_resubmitted() {
    let mut supply = Supply::new();
    let mut other = Supply::new();
    let mut miner = Account::new(1);
    let mut batcher = FeeAuctionBatcher::new(FeeRate::ZERO, 1, 0);

    batcher.add_entry(tx(1, 0), supply.increase(u64::MAX).unwrap()).unwrap();
    let rejected = batcher
        .add_entry(tx(2, 0), other.increase(5).unwrap())
        .unwrap_err();
    assert_eq!(rejected.error, AuctionError::ArithmeticOverflow);
    assert!(rejected.to_string().contains("rejected"));

    batcher.mine(&mut miner, 1).unwrap();
    supply.decrease(batcher.extract_fees());

    // Next block accepts it
    batcher.add_entry(rejected.entry, rejected.bid).unwrap();
    let block = batcher.mine(&mut miner, 2).unwrap();
    assert_eq!(block.entries_at(5), Some(&[tx(2, 0)][..]));
    other.decrease(batcher.extract_fees());
    assert_eq!(other.outstanding(), 0);
}
