use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use sw_core::{Article, Error, LanguageModel, Result, SourceRecord};
use sw_inference::prompts::{self, OutputStyle};
use sw_search::{assemble, merge_fetched, SearchClient};
use sw_spider::PageFetcher;

use crate::outline::parse_outline;
use crate::summarizer::{Summarizer, DEFAULT_WORKERS};

/// How the writer gathers source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Aggregator snippets only.
    Simple,
    /// Fetch full page text for every result through the headless
    /// browser ("spider" mode).
    Detailed,
}

#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub mode: WriteMode,
    /// Sources used for per-source outline generation. The production
    /// deployment runs with 1; see DESIGN.md.
    pub outline_source_cap: usize,
    /// Worker bound for per-source model calls.
    pub workers: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            mode: WriteMode::Simple,
            outline_source_cap: 1,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Drives a run end to end: query, optional fetch, per-source outlines,
/// outline merge and parse, section-by-section expansion, assembly.
///
/// Nothing retries. Any stage failure surfaces to the caller; a
/// malformed merged outline and an empty result set end the run, while
/// individual fetch failures degrade to snippet-only sources.
pub struct Writer {
    search: SearchClient,
    fetcher: PageFetcher,
    model: Arc<dyn LanguageModel>,
    summarizer: Summarizer,
    config: WriterConfig,
}

impl Writer {
    pub fn new(
        search: SearchClient,
        fetcher: PageFetcher,
        model: Arc<dyn LanguageModel>,
        config: WriterConfig,
    ) -> Self {
        let summarizer = Summarizer::with_workers(model.clone(), config.workers);
        Self {
            search,
            fetcher,
            model,
            summarizer,
            config,
        }
    }

    /// Run the full pipeline for one topic.
    pub async fn write(&self, topic: &str) -> Result<Article> {
        self.write_with_progress(topic, |_, _, _| {}).await
    }

    /// Like [`Writer::write`], invoking `progress` before each section
    /// expansion with `(index, section_count, heading)`.
    pub async fn write_with_progress<F>(&self, topic: &str, progress: F) -> Result<Article>
    where
        F: FnMut(usize, usize, &str),
    {
        let sources = self.gather_sources(topic).await?;
        self.write_from_sources(topic, &sources, progress).await
    }

    /// The pipeline from an already-gathered source set onward.
    pub async fn write_from_sources<F>(
        &self,
        topic: &str,
        sources: &[SourceRecord],
        mut progress: F,
    ) -> Result<Article>
    where
        F: FnMut(usize, usize, &str),
    {
        if sources.is_empty() {
            return Err(Error::EmptyResults);
        }

        info!("🧩 generating per-source outlines");
        let cap = self.config.outline_source_cap.max(1).min(sources.len());
        let outlines = self
            .summarizer
            .summarize_sources(&sources[..cap], topic, OutputStyle::OutlineGen)
            .await?;

        info!("🧵 merging outlines");
        let merged = self
            .model
            .complete(
                OutputStyle::OutlineMerge.system_prompt(),
                &prompts::merge_prompt(topic, &outlines),
            )
            .await?;
        let outline = parse_outline(&merged)?;
        let outline_context = serde_json::to_string(&outline)?;

        let total = outline.sections.len();
        let mut sections = Vec::with_capacity(total);
        for (index, section) in outline.sections.iter().enumerate() {
            progress(index, total, &section.heading);
            info!("✍️ writing section {}/{}: {}", index + 1, total, section.heading);
            let fragment = section.to_prompt_fragment();
            let excerpts = self
                .summarizer
                .summarize_sources(
                    sources,
                    &prompts::section_question(&outline_context, &fragment),
                    OutputStyle::SectionBody,
                )
                .await?;
            let expansion = self
                .model
                .complete(
                    OutputStyle::SectionBody.system_prompt(),
                    &prompts::section_expansion_prompt(&outline_context, &excerpts, &fragment),
                )
                .await?;
            sections.push(expansion);
        }

        info!("✅ article assembled ({} sections)", sections.len());
        Ok(Article::new(outline.title, outline.summary, sections))
    }

    /// One-shot research mode: summarize every gathered source and, when
    /// `merge` is set, fold the digests into a single answer.
    pub async fn research(&self, topic: &str, merge: bool) -> Result<String> {
        let sources = self.gather_sources(topic).await?;
        let digests = self
            .summarizer
            .summarize_sources(&sources, topic, OutputStyle::Article)
            .await?;
        if !merge {
            return Ok(digests);
        }
        info!("🧵 merging digests");
        self.model
            .complete(
                OutputStyle::FinalSummary.system_prompt(),
                &prompts::final_summary_prompt(topic, &digests),
            )
            .await
    }

    async fn gather_sources(&self, topic: &str) -> Result<Vec<SourceRecord>> {
        info!("🔎 searching: {}", topic);
        let results = self.search.search(topic).await?;
        if results.is_empty() {
            return Err(Error::EmptyResults);
        }
        let mut sources = assemble(results);
        if self.config.mode == WriteMode::Detailed {
            info!("🕷️ fetching {} pages", sources.len());
            let urls: Vec<String> = sources.iter().map(|s| s.url.clone()).collect();
            let pages = self.fetcher.fetch_all(&urls).await?;
            let fetched: HashMap<String, String> =
                pages.into_iter().map(|p| (p.url, p.text)).collect();
            merge_fetched(&mut sources, &fetched);
        }
        Ok(sources)
    }
}
