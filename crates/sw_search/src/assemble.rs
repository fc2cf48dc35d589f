use std::collections::{HashMap, HashSet};

use sw_core::{SearchResult, SourceRecord};

/// Build the run's source set from filtered search results, seeding each
/// record's content with the aggregator snippet. URLs are deduplicated;
/// the first occurrence wins.
pub fn assemble(results: Vec<SearchResult>) -> Vec<SourceRecord> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .map(|r| SourceRecord {
            title: r.title,
            url: r.url,
            content: r.snippet,
        })
        .collect()
}

/// Append fetched page text to matching records. A URL with no fetched
/// text (failed or skipped fetch) keeps its snippet-only content.
pub fn merge_fetched(sources: &mut [SourceRecord], fetched: &HashMap<String, String>) {
    for source in sources.iter_mut() {
        if let Some(text) = fetched.get(&source.url) {
            source.content.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> SearchResult {
        SearchResult {
            title: format!("title {}", url),
            url: url.to_string(),
            score: 0.5,
            snippet: "snippet ".to_string(),
        }
    }

    #[test]
    fn duplicate_urls_collapse_to_one_record() {
        let sources = assemble(vec![
            result("https://a.example"),
            result("https://a.example"),
            result("https://b.example"),
        ]);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url, "https://a.example");
    }

    #[test]
    fn fetched_text_is_appended_after_the_snippet() {
        let mut sources = assemble(vec![result("https://a.example"), result("https://b.example")]);
        let fetched = HashMap::from([("https://a.example".to_string(), "page body".to_string())]);
        merge_fetched(&mut sources, &fetched);
        assert_eq!(sources[0].content, "snippet page body");
        // No fetched text for b: snippet-only content survives.
        assert_eq!(sources[1].content, "snippet ");
    }
}
