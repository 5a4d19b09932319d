//! TUI-less "say" command

use std::error::Error;

use tracing::info;

use super::Settings;
use crate::core::backend::ChatBackend;
use crate::core::constants::EMPTY_REPLY_FALLBACK;
use crate::ui::inline::{flatten, format_inline};
use crate::ui::segment::{segment, LineKind};

pub async fn run_say(text: String, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let text = text.trim();
    if text.is_empty() {
        eprintln!("Usage: analista say <text>");
        std::process::exit(1);
    }

    let backend = settings.backend()?;
    let session = settings.session();
    info!(model = %settings.model, "one-shot exchange");

    match backend.send_message(&session, text).await {
        Ok(reply) => {
            println!("{}", render_plain(&reply.text));
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    }
}

/// Segment and format a reply for plain stdout.
///
/// Emphasis markers are dropped, headings are underlined and options keep
/// their prefix.
pub fn render_plain(reply: &str) -> String {
    let reply = if reply.trim().is_empty() {
        EMPTY_REPLY_FALLBACK
    } else {
        reply
    };

    let mut out = Vec::new();
    for token in segment(reply) {
        let body = flatten(&format_inline(&token.content));
        match token.kind {
            LineKind::Heading2 => {
                let rule = "─".repeat(unicode_width::UnicodeWidthStr::width(body.as_str()));
                out.push(body);
                out.push(rule);
            }
            LineKind::Heading3 | LineKind::Paragraph => out.push(body),
            LineKind::Option => match token.prefix {
                Some(prefix) => out.push(format!("{prefix} {body}")),
                None => out.push(body),
            },
            LineKind::Blank => out.push(String::new()),
        }
    }
    out.join("\n")
}
