pub mod commands;

pub use commands::{Command, Opt, SelectionModeArg};
