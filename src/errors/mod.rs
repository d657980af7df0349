pub mod types;
pub mod classification;

pub use types::GateError;
pub use classification::{
    ErrorClassification, EXIT_AUTH, EXIT_CONFIG, EXIT_FAIL, EXIT_INCOMPLETE, EXIT_PASS, EXIT_REMOTE,
};
