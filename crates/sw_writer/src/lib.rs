pub mod outline;
pub mod orchestrator;
pub mod summarizer;

pub use orchestrator::{WriteMode, Writer, WriterConfig};
pub use outline::parse_outline;
pub use summarizer::{Summarizer, CONTENT_BUDGET, DEFAULT_WORKERS};
