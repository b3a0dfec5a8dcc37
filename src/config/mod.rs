//! JSON runtime configuration for the binaries.

pub mod completion;
pub mod tune;

pub use completion::{load_config, RuntimeConfig};
pub use tune::{ParamRange, TuneConfig};
