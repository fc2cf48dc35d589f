use scraper::Html;

/// Markup whose text never renders as page copy. Anchors and buttons are
/// interactive-only boilerplate on the pages this pipeline reads.
const HIDDEN_TAGS: &[&str] = &["style", "script", "head", "title", "meta", "button", "a"];

/// Extract the human-visible text of an HTML document.
///
/// Keeps text nodes only, so markup and comments never appear in the
/// output; drops anything nested under one of the hidden tags; collapses
/// all whitespace runs to single spaces.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();
    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| HIDDEN_TAGS.contains(&el.name()))
                .unwrap_or(false)
        });
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

/// Collapse runs of whitespace and zero-width spaces to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{200b}')
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>Page Title</title>
            <meta name="description" content="meta text">
            <style>.hidden { display: none; }</style>
            <script>var tracking = "beacon";</script>
          </head>
          <body>
            <!-- navigation comment -->
            <h1>Main   Heading</h1>
            <p>First paragraph
               spread over lines.</p>
            <a href="/next">Next page</a>
            <button>Click me</button>
            <div><p>Nested <b>bold</b> text.</p></div>
          </body>
        </html>
    "#;

    #[test]
    fn excludes_non_rendering_markup() {
        let text = visible_text(PAGE);
        assert!(!text.contains("Page Title"));
        assert!(!text.contains("display: none"));
        assert!(!text.contains("beacon"));
        assert!(!text.contains("meta text"));
    }

    #[test]
    fn excludes_comments_and_interactive_boilerplate() {
        let text = visible_text(PAGE);
        assert!(!text.contains("navigation comment"));
        assert!(!text.contains("Next page"));
        assert!(!text.contains("Click me"));
    }

    #[test]
    fn keeps_visible_text_with_collapsed_whitespace() {
        let text = visible_text(PAGE);
        assert!(text.contains("Main Heading"));
        assert!(text.contains("First paragraph spread over lines."));
        assert!(text.contains("Nested bold text."));
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn output_carries_no_raw_markup() {
        let text = visible_text(PAGE);
        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
    }

    #[test]
    fn collapse_strips_zero_width_spaces() {
        assert_eq!(collapse_whitespace("a\u{200b}b\t\tc\r\nd"), "a b c d");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
