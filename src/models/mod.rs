pub mod config;
pub mod job;

pub use config::{ChannelFlags, JobConfig};
pub use job::{JobParameters, FALLBACK_DPI};
