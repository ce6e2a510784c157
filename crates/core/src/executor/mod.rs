//! Transcode execution and the filesystem mutation that follows it.
//!
//! A source is only deleted, or replaced, after the new file has been seen on
//! disk. Any failure before that point leaves the source untouched.

mod error;
mod transcode;

pub use error::ExecuteError;
pub use transcode::{Execution, Executor};
