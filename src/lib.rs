// Library exports for the binary and integration tests

pub mod archive;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod logging;
pub mod merge;
pub mod projection;
pub mod schema;
pub mod stats;

pub use convert::{convert, convert_with_report, ConversionReport};
pub use error::{BackupError, Result};
pub use format::BackupFormat;
pub use merge::{merge, merge_with_summary, MergeSummary};
pub use schema::TypedBackup;
