use crate::core::SelectionMode;
use clap::{Parser, Subcommand};
use std::str::FromStr;

/// Pool selection strategy, as named on the command line
#[derive(Debug, Clone, Copy)]
pub enum SelectionModeArg {
    Greedy,
    Random,
    Altruistic,
    Affinity,
}

impl SelectionModeArg {
    pub fn to_mode(self) -> SelectionMode {
        match self {
            SelectionModeArg::Greedy => SelectionMode::Greedy,
            SelectionModeArg::Random => SelectionMode::Random,
            SelectionModeArg::Altruistic => SelectionMode::Altruistic,
            SelectionModeArg::Affinity => SelectionMode::Affinity,
        }
    }
}

impl FromStr for SelectionModeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(SelectionModeArg::Greedy),
            "random" => Ok(SelectionModeArg::Random),
            "altruistic" => Ok(SelectionModeArg::Altruistic),
            "affinity" => Ok(SelectionModeArg::Affinity),
            _ => Err(format!(
                "Invalid selection mode: {s}. Valid options: greedy, random, altruistic, affinity"
            )),
        }
    }
}

impl std::fmt::Display for SelectionModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionModeArg::Greedy => write!(f, "greedy"),
            SelectionModeArg::Random => write!(f, "random"),
            SelectionModeArg::Altruistic => write!(f, "altruistic"),
            SelectionModeArg::Affinity => write!(f, "affinity"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pow-ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "createwallet", about = "Create a new wallet")]
    Createwallet,
    #[command(
        name = "validatekeys",
        about = "Check that a private key matches an address"
    )]
    ValidateKeys {
        #[arg(help = "Hex-encoded private key material")]
        key: String,
        #[arg(help = "The claimed wallet address")]
        address: String,
    },
    #[command(
        name = "run",
        about = "Run a mining session: seed transactions, mine blocks, validate"
    )]
    Run {
        #[arg(help = "Number of blocks to mine after the funding block")]
        blocks: u64,
        #[arg(
            long = "transactions",
            default_value_t = 3,
            help = "Transactions seeded before each block"
        )]
        transactions: u32,
        #[arg(
            long = "mode",
            default_value_t = SelectionModeArg::Greedy,
            help = "Selection mode (greedy, random, altruistic, affinity)"
        )]
        mode: SelectionModeArg,
        #[arg(long = "workers", help = "Mining worker threads")]
        workers: Option<usize>,
        #[arg(long = "difficulty", help = "Starting difficulty (leading zero hex digits)")]
        difficulty: Option<u32>,
        #[arg(long = "target", help = "Target block interval in seconds")]
        target: Option<f64>,
    },
}
