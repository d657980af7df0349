pub mod credentials;
pub mod parser;
pub mod types;

pub use types::*;
pub use parser::{parse_config_file, vars, ConfigSource, RUN_REQUIRED, TENABLE_REQUIRED};
