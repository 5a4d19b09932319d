//! Cleaning of text that arrives from the terminal outside of key events.

/// Make pasted text safe to place in the input buffer.
///
/// Tabs become four spaces, carriage returns become newlines, and every
/// other control character is dropped.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' | '\n' => sanitized.push('\n'),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(sanitize_text_input("Me siento tenso"), "Me siento tenso");
    }

    #[test]
    fn tabs_and_carriage_returns_are_normalized() {
        assert_eq!(sanitize_text_input("a\tb\rc\r\nd"), "a    b\nc\n\nd");
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(sanitize_text_input("ho\x07la\x00\x1b"), "hola");
    }
}
