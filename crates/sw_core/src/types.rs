use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked hit from the search aggregator. Discarded once the run's
/// source set has been assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub score: f64,
    pub snippet: String,
}

/// A search result plus whatever page text was fetched for it. The unit
/// of independent summarization work. `url` is unique within a run's
/// source set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Structured outline merged from the per-source outline candidates.
/// Section order here fixes the section order of the final article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub summary: String,
    #[serde(rename = "content_outline")]
    pub sections: Vec<OutlineSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    #[serde(rename = "h1")]
    pub heading: String,
    /// Any further descriptive fields the model emitted. Not interpreted;
    /// passed through to the expansion prompts verbatim.
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl OutlineSection {
    /// Render the section as the JSON fragment quoted in prompts.
    pub fn to_prompt_fragment(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.heading.clone())
    }
}

/// The finished article. Assembled once, then immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    /// Expanded section bodies, in outline order.
    pub sections: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: String, summary: String, sections: Vec<String>) -> Self {
        Self {
            title,
            summary,
            sections,
            generated_at: Utc::now(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n> {}\n\n", self.title, self.summary);
        for section in &self.sections {
            out.push_str(section);
            out.push_str("\n\n");
        }
        out
    }

    /// Write the markdown rendering to `dir/<title>.md`, creating the
    /// directory if needed. Returns the path written.
    pub fn write_to(&self, dir: &std::path::Path) -> crate::Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.md", self.title.replace(['/', '\\'], "-")));
        std::fs::write(&path, self.to_markdown())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_section_keeps_extra_fields() {
        let section: OutlineSection = serde_json::from_str(
            r#"{"h1": "Background", "description": "where it all started", "keywords": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(section.heading, "Background");
        let fragment = section.to_prompt_fragment();
        assert!(fragment.contains("\"h1\":\"Background\""));
        assert!(fragment.contains("where it all started"));
    }

    #[test]
    fn outline_round_trips_with_renamed_fields() {
        let payload = r#"{"title":"T","summary":"S","content_outline":[{"h1":"One"},{"h1":"Two"}]}"#;
        let outline: Outline = serde_json::from_str(payload).unwrap();
        assert_eq!(outline.sections.len(), 2);
        let back = serde_json::to_string(&outline).unwrap();
        assert!(back.contains("content_outline"));
        assert!(back.contains("\"h1\":\"One\""));
    }

    #[test]
    fn article_markdown_preserves_section_order() {
        let article = Article::new(
            "Title".into(),
            "Summary".into(),
            vec!["first".into(), "second".into(), "third".into()],
        );
        let md = article.to_markdown();
        let first = md.find("first").unwrap();
        let second = md.find("second").unwrap();
        let third = md.find("third").unwrap();
        assert!(first < second && second < third);
        assert!(md.starts_with("# Title\n\n> Summary"));
    }
}
