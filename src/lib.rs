pub mod cli;
pub mod config;
pub mod images;
pub mod lookup;
pub mod reconcile;
pub mod sync;
pub mod tables;

pub use cli::{Cli, Commands};
pub use config::{Config, ConfigError, Defaults};
pub use reconcile::{reconcile_defenses, reconcile_weapons, Reconciliation};
