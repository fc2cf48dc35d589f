use sw_core::text::truncate_chars;
use sw_core::{Error, Outline, Result};

/// Wrapper tokens language models commonly emit around structured
/// payloads.
const WRAPPER_TOKENS: &[&str] = &["```json", "```"];

/// Strip newlines and code-fence markers from a structured payload.
pub fn strip_wrapper_tokens(payload: &str) -> String {
    let mut cleaned = payload.replace('\n', "");
    for token in WRAPPER_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned.trim().to_string()
}

/// Tolerant decode of a merged-outline payload: strip known wrapper
/// tokens, then require a well-formed outline. A failure here is
/// terminal for the run and reported as [`Error::OutlinePayload`].
pub fn parse_outline(payload: &str) -> Result<Outline> {
    let cleaned = strip_wrapper_tokens(payload);
    serde_json::from_str(&cleaned).map_err(|e| {
        Error::OutlinePayload(format!("{}; payload: {}", e, truncate_chars(&cleaned, 200)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{"title":"T","summary":"S","content_outline":[{"h1":"A"},{"h1":"B"}]}"#;

    #[test]
    fn parses_bare_payloads() {
        let outline = parse_outline(BARE).unwrap();
        assert_eq!(outline.title, "T");
        assert_eq!(outline.sections.len(), 2);
    }

    #[test]
    fn parses_fenced_and_newline_littered_payloads() {
        let fenced = format!("```json\n{}\n```", BARE.replace(',', ",\n"));
        let outline = parse_outline(&fenced).unwrap();
        assert_eq!(outline.sections[1].heading, "B");
    }

    #[test]
    fn missing_closing_brace_is_an_outline_payload_error() {
        let truncated = &BARE[..BARE.len() - 1];
        match parse_outline(truncated) {
            Err(Error::OutlinePayload(_)) => {}
            other => panic!("expected OutlinePayload error, got {:?}", other.map(|o| o.title)),
        }
    }

    #[test]
    fn prose_around_the_json_is_still_an_error() {
        let chatty = format!("Here is your outline: {}", BARE);
        assert!(matches!(
            parse_outline(&chatty),
            Err(Error::OutlinePayload(_))
        ));
    }
}
