pub mod config;
pub mod date;
pub mod ledger;
pub mod media;
pub mod planner;
pub mod resolve;
pub mod server;
pub mod walk;

pub use config::MediaDirs;
pub use date::{EmbeddedReader, MetadataReader};
pub use ledger::ChecksumLedger;
pub use media::{MediaRecord, MediaType};
pub use walk::{organize, RunSummary};
