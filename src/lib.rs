pub mod config;
pub mod duck;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod load;
pub mod pipeline;
pub mod progress;
pub mod transform;
pub mod types;

pub use config::Config;
pub use error::{EtlError, Result};
pub use progress::{FileProgressLog, MemoryProgressLog, ProgressLog};
pub use types::{CompanyRecord, EnrichedRecord, RankedRecord};
