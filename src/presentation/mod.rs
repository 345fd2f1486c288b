#[cfg(feature = "cli")]
pub mod job_summary;
pub mod writers;
