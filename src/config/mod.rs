pub mod env;
pub mod loader;
pub mod types;

pub use loader::{discover_config_files, load_config, require_credentials};
pub use types::{CratedigConfig, ProviderConfig};
