//! Hidden-field and inline-script token extraction
//!
//! The redirector sites carry continuation tokens in two places: hidden
//! form inputs in the HTML, and obfuscated variable assignments inside
//! inline script text. The first needs DOM lookups, the second
//! regex-over-text. Both live here, behind a pattern set that can be
//! swapped when the upstream markup drifts.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{MlwbdError, Result};

/// The ephemeral token pair posted to a link API hop
///
/// Extracted fresh for every resolution attempt and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokens {
    /// Session continuation token (`sss` in the page script)
    pub s: String,
    /// Verification token (`v` in the page script)
    pub v: String,
}

/// Returns the value of the first hidden input with the given name
///
/// # Example
/// ```
/// use scraper::Html;
/// use mlwbd_core::parser::tokens::hidden_field;
///
/// let doc = Html::parse_document(r#"<input type="hidden" name="FU" value="abc123">"#);
/// assert_eq!(hidden_field(&doc, "FU"), Some("abc123".to_string()));
/// ```
pub fn hidden_field(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"input[type="hidden"][name="{name}"]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| value.to_string())
}

/// How the verification token is hidden in the script text
enum ViewerPattern {
    /// Inside an obfuscated array literal, at a fixed index; the generic
    /// fallback matches any hexadecimal-named variable assigned a
    /// bracketed literal
    ArrayIndex {
        primary: Regex,
        fallback: Regex,
        index: usize,
    },
    /// A plain quoted assignment
    Quoted(Regex),
}

/// Pattern set for one redirector chain
///
/// Both chains embed `sss` as a quoted string but hide `v` differently.
/// Patterns are data: upstream markup drift means a new constructor
/// here, not new extraction logic.
pub struct ScriptPatterns {
    session: Regex,
    viewer: ViewerPattern,
}

impl ScriptPatterns {
    /// Patterns for the download-links chain (`v` hides in an array)
    pub fn download_chain() -> Self {
        Self {
            session: Regex::new(r"var sss = '(.*?)'; var").expect("hardcoded pattern is valid"),
            viewer: ViewerPattern::ArrayIndex {
                primary: Regex::new(r"_0x12fb2a=(.*?);_0x3073")
                    .expect("hardcoded pattern is valid"),
                fallback: Regex::new(r"var\s+_0x[a-f0-9]+\s*=\s*(\[.*?\]);")
                    .expect("hardcoded pattern is valid"),
                index: 18,
            },
        }
    }

    /// Patterns for the direct-link chain (`v` is a quoted assignment)
    pub fn direct_chain() -> Self {
        Self {
            session: Regex::new(r"var sss = '(.*?)';").expect("hardcoded pattern is valid"),
            viewer: ViewerPattern::Quoted(
                Regex::new(r"v: '(.*?)'").expect("hardcoded pattern is valid"),
            ),
        }
    }

    /// Extracts the token pair from an inline-script response body
    ///
    /// # Errors
    /// - `TokenNotFound` when a pattern matches nothing
    /// - `MalformedArray` when the array literal cannot be parsed or is
    ///   too short for the fixed index
    pub fn api_tokens(&self, script: &str) -> Result<ApiTokens> {
        let s = capture(&self.session, script).ok_or(MlwbdError::TokenNotFound("sss"))?;

        let v = match &self.viewer {
            ViewerPattern::Quoted(pattern) => {
                capture(pattern, script).ok_or(MlwbdError::TokenNotFound("v"))?
            }
            ViewerPattern::ArrayIndex {
                primary,
                fallback,
                index,
            } => {
                let raw = capture(primary, script)
                    .or_else(|| {
                        debug!("primary array pattern missed, trying generic pattern");
                        capture(fallback, script)
                    })
                    .ok_or(MlwbdError::TokenNotFound("script array"))?;
                let items = parse_array_literal(&raw)?;
                items.get(*index).cloned().ok_or_else(|| {
                    MlwbdError::MalformedArray(format!(
                        "array has {} items, need index {}",
                        items.len(),
                        index
                    ))
                })?
            }
        };

        Ok(ApiTokens { s, v })
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parses a JS array literal of strings and numbers into its items
///
/// Data only, no code execution: single- or double-quoted strings with
/// backslash escapes, bare numbers. Numbers keep their source text.
///
/// # Errors
/// Returns `MalformedArray` for anything that is not a bracketed list
/// of string/number literals.
pub fn parse_array_literal(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| MlwbdError::MalformedArray("missing brackets".to_string()))?;

    let chars: Vec<char> = inner.chars().collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        match c {
            quote @ ('\'' | '"') => {
                i += 1;
                let mut value = String::new();
                let mut closed = false;
                while i < chars.len() {
                    match chars[i] {
                        '\\' if i + 1 < chars.len() => {
                            value.push(chars[i + 1]);
                            i += 2;
                        }
                        c if c == quote => {
                            closed = true;
                            i += 1;
                            break;
                        }
                        other => {
                            value.push(other);
                            i += 1;
                        }
                    }
                }
                if !closed {
                    return Err(MlwbdError::MalformedArray("unterminated string".to_string()));
                }
                items.push(value);
            }
            c if c == '-' || c.is_ascii_digit() => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                items.push(chars[start..i].iter().collect());
            }
            other => {
                return Err(MlwbdError::MalformedArray(format!(
                    "unexpected character {other:?}"
                )));
            }
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quoted_array(len: usize) -> String {
        let items: Vec<String> = (0..len).map(|i| format!("'tok{}'", i)).collect();
        format!("[{}]", items.join(","))
    }

    // -----------------------------------------------------------------------
    // hidden_field
    // -----------------------------------------------------------------------

    #[test]
    fn test_hidden_field_found() {
        let doc = Html::parse_document(
            r#"<form><input type="hidden" name="FU" value="abc123"></form>"#,
        );
        assert_eq!(hidden_field(&doc, "FU"), Some("abc123".to_string()));
    }

    #[test]
    fn test_hidden_field_takes_first_match() {
        let doc = Html::parse_document(
            r#"
            <input type="hidden" name="FU" value="first">
            <input type="hidden" name="FU" value="second">
            "#,
        );
        assert_eq!(hidden_field(&doc, "FU"), Some("first".to_string()));
    }

    #[test]
    fn test_hidden_field_missing() {
        let doc = Html::parse_document(r#"<input type="hidden" name="FN" value="x">"#);
        assert_eq!(hidden_field(&doc, "FU"), None);
    }

    #[test]
    fn test_hidden_field_ignores_visible_inputs() {
        let doc = Html::parse_document(r#"<input type="text" name="FU" value="typed">"#);
        assert_eq!(hidden_field(&doc, "FU"), None);
    }

    // -----------------------------------------------------------------------
    // download-chain patterns
    // -----------------------------------------------------------------------

    #[test]
    fn test_download_chain_tokens() {
        let array = quoted_array(19);
        let script = format!(
            "<script>var sss = 'session-token'; var other = 1; _0x12fb2a={};_0x3073();</script>",
            array
        );

        let tokens = ScriptPatterns::download_chain().api_tokens(&script).unwrap();
        assert_eq!(tokens.s, "session-token");
        assert_eq!(tokens.v, "tok18");
    }

    #[test]
    fn test_download_chain_generic_fallback() {
        let array = quoted_array(20);
        let script = format!(
            "<script>var sss = 'session-token'; var keep = 2; var _0x9fe2ab = {};</script>",
            array
        );

        let tokens = ScriptPatterns::download_chain().api_tokens(&script).unwrap();
        assert_eq!(tokens.v, "tok18");
    }

    #[test]
    fn test_download_chain_missing_session() {
        let script = format!("_0x12fb2a={};_0x3073()", quoted_array(19));
        let result = ScriptPatterns::download_chain().api_tokens(&script);
        match result {
            Err(MlwbdError::TokenNotFound("sss")) => {}
            other => panic!("Expected TokenNotFound(sss), got {:?}", other),
        }
    }

    #[test]
    fn test_download_chain_missing_array() {
        let script = "var sss = 'session-token'; var nothing_else = 1;";
        let result = ScriptPatterns::download_chain().api_tokens(script);
        match result {
            Err(MlwbdError::TokenNotFound("script array")) => {}
            other => panic!("Expected TokenNotFound(script array), got {:?}", other),
        }
    }

    #[test]
    fn test_download_chain_array_too_short() {
        let script = format!(
            "var sss = 'session-token'; var x = 0; _0x12fb2a={};_0x3073()",
            quoted_array(10)
        );
        let result = ScriptPatterns::download_chain().api_tokens(&script);
        match result {
            Err(MlwbdError::MalformedArray(msg)) => {
                assert!(msg.contains("10 items"));
            }
            other => panic!("Expected MalformedArray, got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // direct-chain patterns
    // -----------------------------------------------------------------------

    #[test]
    fn test_direct_chain_tokens() {
        let script = r#"
            <script>
            var sss = 'direct-session';
            fetch('/api', { v: 'direct-verify' });
            </script>
        "#;

        let tokens = ScriptPatterns::direct_chain().api_tokens(script).unwrap();
        assert_eq!(tokens.s, "direct-session");
        assert_eq!(tokens.v, "direct-verify");
    }

    #[test]
    fn test_direct_chain_missing_viewer() {
        let script = "var sss = 'direct-session';";
        let result = ScriptPatterns::direct_chain().api_tokens(script);
        match result {
            Err(MlwbdError::TokenNotFound("v")) => {}
            other => panic!("Expected TokenNotFound(v), got {:?}", other),
        }
    }

    // -----------------------------------------------------------------------
    // parse_array_literal
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_array_single_quotes() {
        let items = parse_array_literal("['a','b','c']").unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_array_double_quotes_and_numbers() {
        let items = parse_array_literal(r#"["first", 42, "second", 3.14, -7]"#).unwrap();
        assert_eq!(items, vec!["first", "42", "second", "3.14", "-7"]);
    }

    #[test]
    fn test_parse_array_escaped_quote() {
        let items = parse_array_literal(r"['it\'s', 'x']").unwrap();
        assert_eq!(items, vec!["it's", "x"]);
    }

    #[test]
    fn test_parse_array_empty() {
        let items = parse_array_literal("[]").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_array_missing_brackets() {
        let result = parse_array_literal("'a','b'");
        match result {
            Err(MlwbdError::MalformedArray(msg)) => assert!(msg.contains("brackets")),
            other => panic!("Expected MalformedArray, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_array_unterminated_string() {
        let result = parse_array_literal("['a','b]");
        match result {
            Err(MlwbdError::MalformedArray(msg)) => assert!(msg.contains("unterminated")),
            other => panic!("Expected MalformedArray, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_array_rejects_code() {
        let result = parse_array_literal("[alert(1)]");
        assert!(matches!(result, Err(MlwbdError::MalformedArray(_))));
    }

    proptest! {
        #[test]
        fn prop_array_literal_roundtrip(values in proptest::collection::vec("[a-zA-Z0-9]{1,12}", 0..24)) {
            let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
            let literal = format!("[{}]", quoted.join(", "));
            let parsed = parse_array_literal(&literal).unwrap();
            prop_assert_eq!(parsed, values);
        }
    }
}
