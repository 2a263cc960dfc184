// Main entry point for the proof-of-work ledger CLI
use clap::Parser;
use log::{error, warn, LevelFilter};
use pow_ledger::{
    utils, validate_key_pair, Command, DifficultyController, Ledger, MiningPolicy, Opt,
    TransactionLog, Wallet, GLOBAL_CONFIG,
};
use std::process;
use std::sync::Arc;

fn main() {
    // Info level gives enough detail without drowning the session output
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Createwallet => {
            let wallet = Wallet::new()?;
            println!("Your new address: {}", wallet.address());
            println!("Private key material: {}", wallet.export_key());
        }
        Command::ValidateKeys { key, address } => {
            let pkcs8 = utils::hex_decode(&key)?;
            if validate_key_pair(&pkcs8, &address) {
                println!("Key pair is valid for {address}");
            } else {
                return Err(format!("Key pair does not match address {address}").into());
            }
        }
        Command::Run {
            blocks,
            transactions,
            mode,
            workers,
            difficulty,
            target,
        } => {
            let workers = workers.unwrap_or_else(|| GLOBAL_CONFIG.worker_count());
            let difficulty = difficulty.unwrap_or_else(|| GLOBAL_CONFIG.default_difficulty());
            let target = target.unwrap_or_else(|| GLOBAL_CONFIG.target_interval());
            let mode = mode.to_mode();

            let miner = Wallet::new()?;
            let miner_address = miner.address();
            println!("Session miner address: {miner_address}");

            let policy = Arc::new(MiningPolicy::new(difficulty));
            let ledger = Arc::new(Ledger::with_policy(Arc::clone(&policy))?);
            let tx_log = TransactionLog::new(GLOBAL_CONFIG.tx_log_path());

            let controller =
                DifficultyController::start(Arc::clone(&ledger), Arc::clone(&policy), target);

            // An empty first block funds the miner so the seeded
            // transactions pass the balance check
            let funding = ledger.mine_block(&miner_address, workers, mode)?;
            println!("{}\n", funding.info());

            for _ in 0..blocks {
                for i in 0..transactions {
                    let recipient = Wallet::new()?.address();
                    let fee = 0.1 * f64::from(i + 1);
                    match ledger.create_transaction(&miner, &miner_address, &recipient, 1.0, fee) {
                        Ok(tx) => tx_log.append(&tx)?,
                        Err(e) => warn!("Skipping seeded transaction: {e}"),
                    }
                }
                let block = ledger.mine_block(&miner_address, workers, mode)?;
                println!("{}\n", block.info());
            }

            controller.stop();

            println!("Pending pool: {}", ledger.get_pool_info());
            println!(
                "Miner balance after {} blocks: {}",
                ledger.block_count() - 1,
                ledger.get_balance(&miner_address)
            );
            match ledger.validate_chain() {
                Ok(()) => println!("Blockchain valid"),
                Err(fault) => return Err(fault.to_string().into()),
            }
        }
    }
    Ok(())
}
