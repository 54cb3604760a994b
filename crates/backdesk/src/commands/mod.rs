//! Command handlers, one module per top-level subcommand.

pub mod compliance;
pub mod config_cmd;
pub mod customers;
pub mod export_cmd;
pub mod reference;
pub mod rewards;
pub mod util;
