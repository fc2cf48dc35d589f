use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::debug;

use sw_core::text::truncate_chars;
use sw_core::{Error, LanguageModel, Result, SourceRecord};
use sw_inference::prompts::{self, OutputStyle};

use crate::outline::strip_wrapper_tokens;

/// Character budget applied to each source's content before prompting,
/// and to the concatenated output.
pub const CONTENT_BUDGET: usize = 8000;

/// In-flight model calls at any one time.
pub const DEFAULT_WORKERS: usize = 5;

/// Summarizes each source independently through the language model.
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
    semaphore: Arc<Semaphore>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_workers(model, DEFAULT_WORKERS)
    }

    pub fn with_workers(model: Arc<dyn LanguageModel>, workers: usize) -> Self {
        Self {
            model,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Run one model call per source and concatenate the results.
    ///
    /// Calls run with bounded concurrency and are gathered as they
    /// complete: the order of the concatenated pieces is unspecified and
    /// may differ between runs. The downstream merge call tolerates any
    /// order. The first failed call fails the whole batch.
    pub async fn summarize_sources(
        &self,
        sources: &[SourceRecord],
        question: &str,
        style: OutputStyle,
    ) -> Result<String> {
        let mut tasks: FuturesUnordered<_> = sources
            .iter()
            .map(|source| {
                let model = self.model.clone();
                let semaphore = self.semaphore.clone();
                async move {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .map_err(|e| Error::External(e.into()))?;
                    let content = truncate_chars(&source.content, CONTENT_BUDGET);
                    let prompt = prompts::source_prompt(content, question);
                    debug!("📝 summarizing {}", source.url);
                    model.complete(style.system_prompt(), &prompt).await
                }
            })
            .collect();

        let mut pieces = Vec::with_capacity(sources.len());
        while let Some(result) = tasks.next().await {
            let piece = result?;
            // Outline candidates get their wrappers stripped per piece so
            // the merged prompt is a clean list of JSON objects.
            pieces.push(match style {
                OutputStyle::OutlineGen => strip_wrapper_tokens(&piece),
                _ => piece,
            });
        }

        let combined = pieces.join("\n");
        Ok(truncate_chars(&combined, CONTENT_BUDGET).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes a configurable payload after a content-dependent delay, so
    /// completion order differs from submission order.
    struct JitteryModel {
        payload: String,
        max_in_flight: AtomicUsize,
        in_flight: AtomicUsize,
    }

    impl JitteryModel {
        fn new(payload: &str) -> Self {
            Self {
                payload: payload.to_string(),
                max_in_flight: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for JitteryModel {
        fn name(&self) -> &str {
            "jittery"
        }

        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            // Longer prompts finish later.
            tokio::time::sleep(Duration::from_millis((prompt.len() % 7) as u64)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    fn source(url: &str, content: &str) -> SourceRecord {
        SourceRecord {
            title: url.to_string(),
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn output_never_exceeds_the_character_budget() {
        let model = Arc::new(JitteryModel::new(&"x".repeat(5000)));
        let summarizer = Summarizer::new(model);
        let sources = vec![
            source("https://a", "aaa"),
            source("https://b", "bbb"),
            source("https://c", "ccc"),
        ];
        let combined = summarizer
            .summarize_sources(&sources, "topic", OutputStyle::Article)
            .await
            .unwrap();
        assert_eq!(combined.chars().count(), CONTENT_BUDGET);
    }

    #[tokio::test]
    async fn every_source_contributes_once() {
        let model = Arc::new(JitteryModel::new("piece"));
        let summarizer = Summarizer::new(model);
        let sources: Vec<_> = (0..4)
            .map(|i| source(&format!("https://{}", i), &"content ".repeat(i + 1)))
            .collect();
        let combined = summarizer
            .summarize_sources(&sources, "topic", OutputStyle::Article)
            .await
            .unwrap();
        assert_eq!(combined.matches("piece").count(), 4);
    }

    #[tokio::test]
    async fn concurrency_stays_within_the_worker_bound() {
        let model = Arc::new(JitteryModel::new("piece"));
        let summarizer = Summarizer::with_workers(model.clone(), 2);
        let sources: Vec<_> = (0..8)
            .map(|i| source(&format!("https://{}", i), &"content ".repeat(i + 1)))
            .collect();
        summarizer
            .summarize_sources(&sources, "topic", OutputStyle::Article)
            .await
            .unwrap();
        assert!(model.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn outline_candidates_are_unwrapped_per_piece() {
        let model = Arc::new(JitteryModel::new(
            "```json\n{\"title\":\"t\"}\n```",
        ));
        let summarizer = Summarizer::new(model);
        let sources = vec![source("https://a", "aaa")];
        let combined = summarizer
            .summarize_sources(&sources, "topic", OutputStyle::OutlineGen)
            .await
            .unwrap();
        assert_eq!(combined, "{\"title\":\"t\"}");
    }

    #[tokio::test]
    async fn long_source_content_is_truncated_before_prompting() {
        struct LengthProbe;

        #[async_trait]
        impl LanguageModel for LengthProbe {
            fn name(&self) -> &str {
                "probe"
            }

            async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
                assert!(prompt.chars().count() < CONTENT_BUDGET + 200);
                Ok("ok".to_string())
            }
        }

        let summarizer = Summarizer::new(Arc::new(LengthProbe));
        let sources = vec![source("https://a", &"y".repeat(CONTENT_BUDGET * 3))];
        summarizer
            .summarize_sources(&sources, "t", OutputStyle::Article)
            .await
            .unwrap();
    }
}
