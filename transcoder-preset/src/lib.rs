pub mod cli;
pub mod client;
pub mod load_config;
pub mod report;

pub use cli::{run, run_with_client, Cli, Commands, Invocation};
