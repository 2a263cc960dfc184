//! End-to-end ledger tests: wallet-signed transactions flowing through the
//! pool into mined, validated blocks.

use pow_ledger::{
    DifficultyController, Ledger, MiningPolicy, SelectionMode, Wallet, BASE_REWARD,
    DEFAULT_DIFFICULTY,
};
use std::sync::Arc;

// Low difficulty keeps the nonce search fast in tests
fn test_ledger() -> Ledger {
    Ledger::with_policy(Arc::new(MiningPolicy::new(1))).unwrap()
}

#[test]
fn test_signed_transfer_end_to_end() {
    let ledger = test_ledger();
    let alice = Wallet::new().unwrap();
    let bob = Wallet::new().unwrap();
    let alice_address = alice.address();
    let bob_address = bob.address();

    // Fund Alice through a block reward before she can spend
    ledger
        .mine_block(&alice_address, 1, SelectionMode::Greedy)
        .unwrap();
    assert_eq!(ledger.get_balance(&alice_address), BASE_REWARD);

    ledger
        .create_transaction(&alice, &alice_address, &bob_address, 5.0, 0.5)
        .unwrap();
    let block = ledger
        .mine_block(&alice_address, 2, SelectionMode::Greedy)
        .unwrap();

    assert_eq!(block.get_index(), 2);
    assert_eq!(block.get_transactions().len(), 2);
    assert!(block.get_hash().starts_with('0'));
    assert!(ledger.validate_chain().is_ok());

    // Alice: two rewards, minus the transfer and its fee, plus the fee
    // she collected back as the miner of the second block
    assert_eq!(
        ledger.get_balance(&alice_address),
        BASE_REWARD + BASE_REWARD + 0.5 - 5.0 - 0.5
    );
    assert_eq!(ledger.get_balance(&bob_address), 5.0);
}

#[test]
fn test_sequential_blocks_stay_linked_and_valid() {
    let ledger = test_ledger();
    for _ in 0..4 {
        ledger
            .mine_block("miner", 2, SelectionMode::Greedy)
            .unwrap();
    }
    assert_eq!(ledger.block_count(), 5);
    assert!(ledger.validate_chain().is_ok());

    let info = ledger.get_chain_info();
    assert!(info.contains("Block index: 0"));
    assert!(info.contains("Block index: 4"));
}

#[test]
fn test_every_selection_mode_produces_valid_blocks() {
    for mode in [
        SelectionMode::Greedy,
        SelectionMode::Random,
        SelectionMode::Altruistic,
        SelectionMode::Affinity,
    ] {
        let ledger = test_ledger();
        let sender = Wallet::new().unwrap();
        let sender_address = sender.address();

        // Fund the sender, then seed more transactions than fit in a block
        ledger
            .mine_block(&sender_address, 1, SelectionMode::Greedy)
            .unwrap();
        for i in 0..5 {
            ledger
                .create_transaction(&sender, &sender_address, "miner", 1.0, 0.1 * f64::from(i))
                .unwrap();
        }

        let block = ledger.mine_block("miner", 1, mode).unwrap();
        // Capacity plus the reward transaction
        assert_eq!(block.get_transactions().len(), 4);
        assert_eq!(ledger.pool_size(), 2);
        assert!(ledger.validate_chain().is_ok());
    }
}

#[test]
fn test_short_pool_degrades_gracefully() {
    let ledger = test_ledger();
    let sender = Wallet::new().unwrap();
    let sender_address = sender.address();

    ledger
        .mine_block(&sender_address, 1, SelectionMode::Greedy)
        .unwrap();
    ledger
        .create_transaction(&sender, &sender_address, "B", 1.0, 0.1)
        .unwrap();

    let block = ledger.mine_block("miner", 1, SelectionMode::Random).unwrap();
    assert_eq!(block.get_transactions().len(), 2);
    assert_eq!(ledger.pool_size(), 0);
    assert!(ledger.validate_chain().is_ok());
}

#[test]
fn test_overspend_rejected_then_accepted_after_reward() {
    let ledger = test_ledger();
    let wallet = Wallet::new().unwrap();
    let address = wallet.address();

    assert!(ledger
        .create_transaction(&wallet, &address, "B", 1.0, 0.0)
        .is_err());

    ledger.mine_block(&address, 1, SelectionMode::Greedy).unwrap();
    assert!(ledger
        .create_transaction(&wallet, &address, "B", 1.0, 0.0)
        .is_ok());
}

#[test]
fn test_controller_stop_restores_default_policy() {
    let policy = Arc::new(MiningPolicy::new(1));
    let ledger = Arc::new(Ledger::with_policy(Arc::clone(&policy)).unwrap());

    let controller = DifficultyController::start(Arc::clone(&ledger), Arc::clone(&policy), 10.0);
    ledger
        .mine_block("miner", 1, SelectionMode::Greedy)
        .unwrap();
    controller.stop();

    assert_eq!(policy.difficulty(), DEFAULT_DIFFICULTY);
    assert_eq!(policy.throttle_ms(), 0);
}
