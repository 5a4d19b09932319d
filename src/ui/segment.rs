//! Line-oriented classification of model replies.
//!
//! Each line of a message is classified on its own, without looking at its
//! neighbours, into one of the [`LineKind`] variants. The result is a flat
//! token list that the bubble renderer turns into terminal lines.
//!
//! ```
//! use analista::ui::segment::{segment, LineKind};
//!
//! let tokens = segment("## Paso 1\nElige:\nA) Personas\n\n1. Dolor");
//! let kinds: Vec<LineKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         LineKind::Heading2,
//!         LineKind::Paragraph,
//!         LineKind::Option,
//!         LineKind::Blank,
//!         LineKind::Option,
//!     ]
//! );
//! assert_eq!(tokens[2].prefix.as_deref(), Some("A)"));
//! assert_eq!(tokens[2].content, "Personas");
//! ```

/// Structural role of a single line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    Heading2,
    Heading3,
    Option,
    Blank,
    Paragraph,
}

/// One classified line of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineToken {
    pub kind: LineKind,
    /// The matched marker (`"1."`, `"a)"`, ...). Only set for options; it is
    /// shown to the user but never sent back to the model.
    pub prefix: Option<String>,
    pub content: String,
    /// Zero-based index of the source line inside the message text.
    pub source_index: usize,
}

/// Split `text` on `\n` and classify every line, blanks included. A `\r`
/// ending a line belongs to the line break, not to the line.
pub fn segment(text: &str) -> Vec<LineToken> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| classify_line(line, index))
        .collect()
}

/// Classify a single line. Checks run in a fixed order and the first match
/// wins: blank, `###`, `##`, option marker, paragraph.
pub fn classify_line(line: &str, source_index: usize) -> LineToken {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineToken {
            kind: LineKind::Blank,
            prefix: None,
            content: String::new(),
            source_index,
        };
    }

    // `###` must be tested before `##`; both share the prefix.
    if let Some(rest) = trimmed.strip_prefix("###") {
        return LineToken {
            kind: LineKind::Heading3,
            prefix: None,
            content: rest.trim_start().to_string(),
            source_index,
        };
    }

    if let Some(rest) = trimmed.strip_prefix("##") {
        return LineToken {
            kind: LineKind::Heading2,
            prefix: None,
            content: rest.trim_start().to_string(),
            source_index,
        };
    }

    if let Some((prefix, content)) = match_option(trimmed) {
        return LineToken {
            kind: LineKind::Option,
            prefix: Some(prefix.to_string()),
            content: content.to_string(),
            source_index,
        };
    }

    LineToken {
        kind: LineKind::Paragraph,
        prefix: None,
        content: line.to_string(),
        source_index,
    }
}

/// Match `digits "."` or `letter [).-]`, then mandatory whitespace, then
/// non-empty text. Returns `(marker, remainder)`.
fn match_option(trimmed: &str) -> Option<(&str, &str)> {
    let marker_len = option_marker_len(trimmed)?;
    let (marker, after) = trimmed.split_at(marker_len);

    let body = after.trim_start();
    let separated = body.len() < after.len();
    if !separated || body.is_empty() {
        return None;
    }

    Some((marker, body))
}

fn option_marker_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();

    if digits > 0 {
        return (bytes.get(digits) == Some(&b'.')).then_some(digits + 1);
    }

    match bytes {
        [first, b')' | b'.' | b'-', ..] if first.is_ascii_alphabetic() => Some(2),
        _ => None,
    }
}
