//! Frontmatter parsing.
//!
//! Posts start with a block fenced by `---` lines holding `key: value` pairs.
//! Only a tiny subset of YAML is understood: scalars, optionally quoted, and
//! flat `[a, b, c]` lists.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

const FENCE: &str = "---";

// the template renders the title, so the body's own H1 is dropped
static LEADING_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A#\s+.+\n+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Frontmatter entries in the order they were written. Unknown keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Frontmatter {
    entries: Vec<(String, Value)>,
}

impl Frontmatter {
    /// Later duplicates replace the earlier value but keep its position.
    pub fn insert(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// A scalar is treated as a one-element list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::List(items)) => items.clone(),
            Some(Value::Scalar(s)) => vec![s.clone()],
            None => vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Frontmatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FENCE}")?;
        for (key, value) in &self.entries {
            match value {
                Value::Scalar(s) if needs_quotes(s) => writeln!(f, "{key}: \"{s}\"")?,
                Value::Scalar(s) => writeln!(f, "{key}: {s}")?,
                Value::List(items) => writeln!(f, "{key}: [{}]", items.join(", "))?,
            }
        }
        writeln!(f, "{FENCE}")
    }
}

fn needs_quotes(s: &str) -> bool {
    s != s.trim() || (s.starts_with('[') && s.ends_with(']')) || is_quoted(s)
}

fn is_quoted(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[0] == bytes[bytes.len() - 1]
}

fn parse_value(value: &str) -> Value {
    if value.starts_with('[') && value.ends_with(']') && value.len() >= 2 {
        return Value::List(
            value[1..value.len() - 1]
                .split(',')
                .map(|item| item.trim().to_string())
                .collect(),
        );
    }
    if is_quoted(value) {
        return Value::Scalar(value[1..value.len() - 1].to_string());
    }
    Value::Scalar(value.to_string())
}

/// Splits `content` into its frontmatter and body.
///
/// Without an opening fence, or when the closing fence is missing, the
/// frontmatter is empty and the body is `content` untouched (the opening
/// fence is not stripped in that case). Otherwise the body is trimmed and its
/// leading `# heading` removed.
pub(crate) fn parse_frontmatter(content: &str) -> (Frontmatter, String) {
    if !content.starts_with(FENCE) {
        return (Frontmatter::default(), content.to_string());
    }

    let parts: Vec<&str> = content.splitn(3, FENCE).collect();
    if parts.len() < 3 {
        return (Frontmatter::default(), content.to_string());
    }

    let mut frontmatter = Frontmatter::default();
    for line in parts[1].trim().split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        frontmatter.insert(key.trim(), parse_value(value.trim()));
    }

    let body = LEADING_HEADING.replace(parts[2].trim(), "").into_owned();
    (frontmatter, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\n\
        title: \"Hello: World\"\n\
        date: 2024-03-01\n\
        description: 'A first post'\n\
        tags: [rust, ssg , blog]\n\
        mood: sunny\n\
        ---\n\
        # Hello: World\n\
        \n\
        Body text.\n";

    #[test]
    fn parses_known_and_unknown_keys() {
        let (fm, body) = parse_frontmatter(POST);
        assert_eq!(fm.scalar("title"), Some("Hello: World"));
        assert_eq!(fm.scalar("date"), Some("2024-03-01"));
        assert_eq!(fm.scalar("description"), Some("A first post"));
        assert_eq!(fm.list("tags"), vec!["rust", "ssg", "blog"]);
        assert_eq!(fm.scalar("mood"), Some("sunny"));
        assert_eq!(body, "Body text.");
    }

    #[test]
    fn known_fields_round_trip() {
        let (fm, _) = parse_frontmatter(POST);
        let reparsed = parse_frontmatter(&format!("{fm}body")).0;
        for key in ["title", "date", "description"] {
            assert_eq!(reparsed.scalar(key), fm.scalar(key), "{key}");
        }
        assert_eq!(reparsed, fm);
    }

    #[test]
    fn quoted_brackets_survive_round_trip() {
        let mut fm = Frontmatter::default();
        fm.insert("title", Value::Scalar("[draft]".to_string()));
        let reparsed = parse_frontmatter(&fm.to_string()).0;
        assert_eq!(reparsed.scalar("title"), Some("[draft]"));
    }

    #[test]
    fn missing_opening_fence_returns_text() {
        let text = "# Title\n\nNo frontmatter.";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn missing_closing_fence_keeps_original_text() {
        let text = "---\ntitle: Dangling\n\n# Heading\nbody";
        let (fm, body) = parse_frontmatter(text);
        assert!(fm.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let (fm, body) = parse_frontmatter("---\ntitle: T\nnonsense\n---\nbody");
        assert_eq!(fm.scalar("title"), Some("T"));
        assert!(fm.get("nonsense").is_none());
        assert_eq!(body, "body");
    }

    #[test]
    fn list_elements_are_not_unquoted() {
        let (fm, _) = parse_frontmatter("---\ntags: [\"a\", b]\n---\n");
        assert_eq!(fm.list("tags"), vec!["\"a\"", "b"]);
    }

    #[test]
    fn only_first_heading_is_stripped() {
        let (_, body) = parse_frontmatter("---\ntitle: T\n---\n# One\n\n\n# Two\ntext");
        assert_eq!(body, "# Two\ntext");
    }

    #[test]
    fn empty_list_holds_one_empty_item() {
        let (fm, _) = parse_frontmatter("---\ntags: []\n---\n");
        assert_eq!(fm.get("tags"), Some(&Value::List(vec![String::new()])));
        assert_eq!(fm.list("tags"), vec![""]);
    }

    #[test]
    fn scalar_reads_as_single_item_list() {
        let (fm, _) = parse_frontmatter("---\ntags: rust\n---\n");
        assert_eq!(fm.scalar("tags"), Some("rust"));
        assert_eq!(fm.list("tags"), vec!["rust"]);
        assert!(fm.list("missing").is_empty());
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let (fm, _) = parse_frontmatter("---\ntitle: a\ntitle: b\n---\n");
        assert_eq!(fm.scalar("title"), Some("b"));
    }
}
