//! Configuration and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{
    ProvisioningPolicy, ReadinessConfig, ReadinessMode, SearchConfig, SourceConfig, SyncConfig,
};
