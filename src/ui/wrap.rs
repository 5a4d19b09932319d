use ratatui::{style::Style, text::Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap styled spans to `max_width` columns at whitespace, keeping styles.
///
/// Whitespace at a wrap point is dropped. Leading whitespace of the first
/// row is kept so indented paragraphs stay indented, unless the indent and
/// the first word do not fit together; then the indent is dropped. Words wider than the
/// row are hard-broken. Always returns at least one (possibly empty) row.
pub fn wrap_spans(spans: &[Span<'static>], max_width: usize) -> Vec<Vec<Span<'static>>> {
    let max_width = max_width.max(1);
    let mut rows: Vec<Vec<Span<'static>>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut width = 0usize;

    for span in spans {
        for piece in split_words(&span.content) {
            let piece_width = UnicodeWidthStr::width(piece);
            if width + piece_width <= max_width {
                push_piece(&mut current, piece, span.style);
                width += piece_width;
                continue;
            }

            if piece.chars().all(char::is_whitespace) {
                break_row(&mut rows, &mut current);
                width = 0;
                continue;
            }

            if width > 0 {
                break_row(&mut rows, &mut current);
                width = 0;
            }

            let mut rest = piece;
            while UnicodeWidthStr::width(rest) > max_width {
                let (head, tail) = split_at_width(rest, max_width);
                push_piece(&mut current, head, span.style);
                rows.push(finish_row(&mut current));
                rest = tail;
            }
            push_piece(&mut current, rest, span.style);
            width = UnicodeWidthStr::width(rest);
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Display width of a row of spans.
pub fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| UnicodeWidthStr::width(s.content.as_ref())).sum()
}

/// Alternating runs of whitespace and non-whitespace.
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        let (_, first) = chars.next()?;
        let space = first.is_whitespace();
        let mut end = start + first.len_utf8();
        while let Some(&(idx, ch)) = chars.peek() {
            if ch.is_whitespace() != space {
                break;
            }
            end = idx + ch.len_utf8();
            chars.next();
        }
        let piece = &text[start..end];
        start = end;
        Some(piece)
    })
}

/// Split so the head fits in `max_width`, always taking at least one char.
fn split_at_width(text: &str, max_width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > max_width && idx > 0 {
            return text.split_at(idx);
        }
        used += cw;
    }
    (text, "")
}

fn push_piece(row: &mut Vec<Span<'static>>, piece: &str, style: Style) {
    if piece.is_empty() {
        return;
    }
    if let Some(last) = row.last_mut() {
        if last.style == style {
            last.content.to_mut().push_str(piece);
            return;
        }
    }
    row.push(Span::styled(piece.to_string(), style));
}

/// End the current row. A row holding only an indent is discarded instead.
fn break_row(rows: &mut Vec<Vec<Span<'static>>>, current: &mut Vec<Span<'static>>) {
    if current.iter().all(|s| s.content.trim().is_empty()) {
        current.clear();
    } else {
        rows.push(finish_row(current));
    }
}

fn finish_row(row: &mut Vec<Span<'static>>) -> Vec<Span<'static>> {
    let mut row = std::mem::take(row);
    while let Some(last) = row.last_mut() {
        let trimmed_len = last.content.trim_end().len();
        if trimmed_len == 0 {
            row.pop();
        } else {
            last.content.to_mut().truncate(trimmed_len);
            break;
        }
    }
    row
}
