pub mod key;
pub mod memory;
pub mod s3;
pub mod traits;

pub use key::report_key;
pub use memory::MemoryReportStore;
pub use s3::S3ReportStore;
pub use traits::ReportStore;
