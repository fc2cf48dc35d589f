use std::sync::Arc;

use sw_core::{LanguageModel, Result};
use sw_search::{SearchClient, SearchConfig};
use sw_spider::{FetchConfig, PageFetcher};
use sw_writer::{WriteMode, Writer, WriterConfig};

/// Maximum sources a request may ask for.
const MAX_SOURCES: usize = 5;

/// Shared state for the HTTP surface: the model handle (owned once per
/// process) plus the configuration templates requests are resolved
/// against.
pub struct AppState {
    pub model: Arc<dyn LanguageModel>,
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub writer: WriterConfig,
}

impl AppState {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            search: SearchConfig::default(),
            fetch: FetchConfig::default(),
            writer: WriterConfig::default(),
        }
    }

    /// Build a writer for one request's mode and source count.
    pub fn writer_for(&self, mode: WriteMode, sources: usize) -> Result<Writer> {
        let mut search = self.search.clone();
        search.result_num = sources.clamp(1, MAX_SOURCES);
        let mut config = self.writer.clone();
        config.mode = mode;
        Ok(Writer::new(
            SearchClient::new(search)?,
            PageFetcher::new(self.fetch.clone()),
            self.model.clone(),
            config,
        ))
    }
}
