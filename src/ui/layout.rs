//! Flattens the conversation into one stream of transcript rows.

use ratatui::text::Line;

use super::bubble::{render_bubble, BubbleContext};
use super::theme::Theme;
use crate::core::app::OptionHotspot;
use crate::core::message::Message;

/// Share of the transcript width a bubble may use.
const BUBBLE_WIDTH_PERCENT: usize = 85;

#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    pub option_hotspots: Vec<OptionHotspot>,
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out every message, one blank row between bubbles.
    ///
    /// Options are only interactive (and only get hotspots) when `on_option`
    /// is supplied.
    pub fn layout_messages(
        messages: &[Message],
        theme: &Theme,
        width: usize,
        on_option: Option<&dyn Fn(&str)>,
    ) -> Layout {
        let bubble_width = Self::bubble_width(width);
        let ctx = BubbleContext {
            theme,
            on_option,
            width: Some(bubble_width),
        };

        let mut layout = Layout::default();
        for (message_index, message) in messages.iter().enumerate() {
            if message_index > 0 {
                layout.lines.push(Line::default());
            }
            let start = layout.lines.len();
            let bubble = render_bubble(message, &ctx);
            layout
                .option_hotspots
                .extend(
                    bubble
                        .options
                        .iter()
                        .enumerate()
                        .map(|(option_index, option)| OptionHotspot {
                            message_index,
                            option_index,
                            rows: start + option.rows.start..start + option.rows.end,
                        }),
                );
            layout.lines.extend(bubble.lines);
        }
        layout
    }

    /// Width handed to each bubble for a transcript `width` columns wide.
    pub fn bubble_width(width: usize) -> usize {
        if width < 40 {
            width.max(1)
        } else {
            width * BUBBLE_WIDTH_PERCENT / 100
        }
    }
}
