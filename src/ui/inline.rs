//! Inline emphasis parsing (`**bold**`, `*italic*`, `__italic__`).
//!
//! The formatter never drops text: concatenating the returned segments gives
//! back the input minus the delimiters of the spans it recognised. Markers
//! without a matching close are kept verbatim inside plain segments.

use memchr::memchr2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InlineStyle {
    Plain,
    Bold,
    Italic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineSegment {
    pub style: InlineStyle,
    pub text: String,
}

impl InlineSegment {
    pub fn new(style: InlineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(InlineStyle::Plain, text)
    }
}

/// Delimiters in the order they are tried at each candidate position.
const MARKERS: [(&str, InlineStyle); 3] = [
    ("**", InlineStyle::Bold),
    ("*", InlineStyle::Italic),
    ("__", InlineStyle::Italic),
];

/// Split `text` into plain and emphasised segments, left to right.
pub fn format_inline(text: &str) -> Vec<InlineSegment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < text.len() {
        let Some(offset) = memchr2(b'*', b'_', &bytes[pos..]) else {
            plain.push_str(&text[pos..]);
            break;
        };
        let candidate = pos + offset;
        plain.push_str(&text[pos..candidate]);

        match match_span(&text[candidate..]) {
            Some((style, inner, consumed)) => {
                if !plain.is_empty() {
                    segments.push(InlineSegment::plain(std::mem::take(&mut plain)));
                }
                segments.push(InlineSegment::new(style, inner));
                pos = candidate + consumed;
            }
            None => {
                // Both marker bytes are ASCII, so this stays on a char boundary.
                plain.push_str(&text[candidate..candidate + 1]);
                pos = candidate + 1;
            }
        }
    }

    if !plain.is_empty() {
        segments.push(InlineSegment::plain(plain));
    }
    segments
}

/// Concatenate segment texts. Mostly useful for plain-text output.
pub fn flatten(segments: &[InlineSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

fn match_span(rest: &str) -> Option<(InlineStyle, &str, usize)> {
    MARKERS.iter().find_map(|&(marker, style)| {
        let after = rest.strip_prefix(marker)?;
        let inner_len = closing_offset(after, marker)?;
        Some((style, &after[..inner_len], marker.len() * 2 + inner_len))
    })
}

/// Byte length of the shortest non-empty inner text followed by `marker`.
fn closing_offset(after: &str, marker: &str) -> Option<usize> {
    let first = after.chars().next()?;
    // `**x` with no closing pair must not be read as an italic `*` around `*x`.
    if marker == "*" && first == '*' {
        return None;
    }
    let skip = first.len_utf8();
    after[skip..].find(marker).map(|idx| idx + skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use InlineStyle::{Bold, Italic, Plain};

    fn styles(text: &str) -> Vec<(InlineStyle, String)> {
        format_inline(text)
            .into_iter()
            .map(|s| (s.style, s.text))
            .collect()
    }

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_eq!(styles("sin formato"), vec![(Plain, "sin formato".into())]);
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn bold_and_italic_spans_are_recognised() {
        assert_eq!(
            styles("Tu **Centro Emocional** es el *Jefe* y __no__ el motor"),
            vec![
                (Plain, "Tu ".into()),
                (Bold, "Centro Emocional".into()),
                (Plain, " es el ".into()),
                (Italic, "Jefe".into()),
                (Plain, " y ".into()),
                (Italic, "no".into()),
                (Plain, " el motor".into()),
            ]
        );
    }

    #[test]
    fn double_asterisk_wins_over_single() {
        assert_eq!(styles("**a**"), vec![(Bold, "a".into())]);
    }

    #[test]
    fn unclosed_markers_stay_literal() {
        assert_eq!(styles("2 * 3 = 6"), vec![(Plain, "2 * 3 = 6".into())]);
        assert_eq!(styles("**abierto"), vec![(Plain, "**abierto".into())]);
        assert_eq!(styles("snake_case__x"), vec![(Plain, "snake_case__x".into())]);
        assert_eq!(styles("****"), vec![(Plain, "****".into())]);
    }

    #[test]
    fn unclosed_bold_falls_back_to_inner_italic() {
        assert_eq!(
            styles("**hola*"),
            vec![(Plain, "*".into()), (Italic, "hola".into())]
        );
    }

    #[test]
    fn multibyte_text_inside_spans() {
        assert_eq!(
            styles("*olla a presión*, ¿sí?"),
            vec![(Italic, "olla a presión".into()), (Plain, ", ¿sí?".into())]
        );
    }

    #[test]
    fn concatenation_only_loses_matched_delimiters() {
        let cases = [
            ("a **b** c", "a b c"),
            ("*x* y *", "x y *"),
            ("__u__ _v_", "u _v_"),
            ("sin nada", "sin nada"),
            ("**", "**"),
        ];
        for (input, expected) in cases {
            let segments = format_inline(input);
            assert_eq!(flatten(&segments), expected, "input: {input:?}");
            assert!(segments.iter().all(|s| !s.text.is_empty()));
        }
    }
}
