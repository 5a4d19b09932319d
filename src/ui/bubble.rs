//! Turns one [`Message`] into styled terminal rows.
//!
//! Each line of the message text is classified by [`segment`], its payload
//! run through [`format_inline`], and the result laid out between an avatar
//! header and a timestamp footer. Option lines of model messages become
//! [`BubbleOption`]s when the caller supplies an activation handler.

use std::fmt;
use std::ops::Range;

use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::core::message::{Message, Role};
use crate::ui::inline::{format_inline, InlineStyle};
use crate::ui::segment::{segment, LineKind};
use crate::ui::theme::Theme;
use crate::ui::wrap::{spans_width, wrap_spans};

pub const MODEL_AVATAR: &str = "◆ Analista";
pub const USER_AVATAR: &str = "● Tú";

pub struct BubbleContext<'a> {
    pub theme: &'a Theme,
    /// Receives the content of an activated option, without its prefix.
    pub on_option: Option<&'a dyn Fn(&str)>,
    /// Wrap width in columns; `None` keeps one row per source line.
    pub width: Option<usize>,
}

/// An interactive option line inside a rendered bubble.
pub struct BubbleOption<'a> {
    pub prefix: String,
    pub content: String,
    /// Rows of [`RenderedBubble::lines`] the option occupies.
    pub rows: Range<usize>,
    handler: &'a dyn Fn(&str),
}

impl BubbleOption<'_> {
    /// Deliver the option's content to the handler it was rendered with.
    pub fn activate(&self) {
        (self.handler)(&self.content);
    }
}

impl fmt::Debug for BubbleOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BubbleOption")
            .field("prefix", &self.prefix)
            .field("content", &self.content)
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct RenderedBubble<'a> {
    pub lines: Vec<Line<'static>>,
    pub options: Vec<BubbleOption<'a>>,
}

impl<'a> RenderedBubble<'a> {
    pub fn option_at_row(&self, row: usize) -> Option<&BubbleOption<'a>> {
        self.options.iter().find(|option| option.rows.contains(&row))
    }
}

pub fn render_bubble<'a>(message: &Message, ctx: &BubbleContext<'a>) -> RenderedBubble<'a> {
    let theme = ctx.theme;
    let role = message.role();
    let text_style = match role {
        Role::User => theme.user_text_style,
        Role::Model => theme.model_text_style,
    };
    let handler = ctx.on_option.filter(|_| role.is_model());

    let mut out = BubbleBuilder {
        lines: Vec::new(),
        width: ctx.width.map(|w| w.max(1)),
        alignment: match role {
            Role::User => Alignment::Right,
            Role::Model => Alignment::Left,
        },
    };
    let mut options = Vec::new();

    let (avatar, avatar_style) = match role {
        Role::User => (USER_AVATAR, theme.user_avatar_style),
        Role::Model => (MODEL_AVATAR, theme.model_avatar_style),
    };
    out.push_row(vec![Span::styled(avatar, avatar_style)]);

    for token in segment(message.text()) {
        match token.kind {
            LineKind::Blank => out.push_row(Vec::new()),
            LineKind::Heading3 => {
                out.push_text(styled_inline(&token.content, theme.heading3_style, theme));
            }
            LineKind::Heading2 => {
                let rows = out.push_text(styled_inline(&token.content, theme.heading2_style, theme));
                let rule_width = match out.width {
                    Some(width) => width,
                    None => rows
                        .map(|row| spans_width(&out.lines[row].spans))
                        .max()
                        .unwrap_or(0),
                };
                out.push_row(vec![Span::styled(
                    "─".repeat(rule_width.max(1)),
                    theme.heading_rule_style,
                )]);
            }
            LineKind::Option => {
                let prefix = token.prefix.unwrap_or_default();
                match handler {
                    Some(handler) => {
                        let lead = vec![Span::styled(
                            format!("[{prefix}] "),
                            theme.option_prefix_style,
                        )];
                        let body = styled_inline(&token.content, theme.option_text_style, theme);
                        let rows = out.push_hanging(lead, body);
                        options.push(BubbleOption {
                            prefix,
                            content: token.content,
                            rows,
                            handler,
                        });
                    }
                    None => {
                        let lead = vec![Span::styled(
                            format!("{prefix} "),
                            theme.inert_option_prefix_style,
                        )];
                        out.push_hanging(lead, styled_inline(&token.content, text_style, theme));
                    }
                }
            }
            LineKind::Paragraph => {
                out.push_text(styled_inline(&token.content, text_style, theme));
            }
        }
    }

    out.push_row(vec![Span::styled(message.time_label(), theme.timestamp_style)]);

    RenderedBubble {
        lines: out.lines,
        options,
    }
}

/// Inline-formatted spans layered over `base`.
fn styled_inline(text: &str, base: Style, theme: &Theme) -> Vec<Span<'static>> {
    format_inline(text)
        .into_iter()
        .map(|segment| {
            let style = match segment.style {
                InlineStyle::Plain => base,
                InlineStyle::Bold => base.patch(theme.bold_style),
                InlineStyle::Italic => base.patch(theme.italic_style),
            };
            Span::styled(segment.text, style)
        })
        .collect()
}

struct BubbleBuilder {
    lines: Vec<Line<'static>>,
    width: Option<usize>,
    alignment: Alignment,
}

impl BubbleBuilder {
    fn push_row(&mut self, spans: Vec<Span<'static>>) {
        self.lines.push(Line::from(spans).alignment(self.alignment));
    }

    fn push_text(&mut self, spans: Vec<Span<'static>>) -> Range<usize> {
        let start = self.lines.len();
        match self.width {
            Some(width) => {
                for row in wrap_spans(&spans, width) {
                    self.push_row(row);
                }
            }
            None => self.push_row(spans),
        }
        start..self.lines.len()
    }

    /// `lead` on the first row, continuation rows indented to match it.
    fn push_hanging(&mut self, lead: Vec<Span<'static>>, body: Vec<Span<'static>>) -> Range<usize> {
        let lead_width = spans_width(&lead);
        match self.width {
            Some(width) if width > lead_width => {
                let start = self.lines.len();
                let rows = wrap_spans(&body, width - lead_width);
                let mut lead = Some(lead);
                for row in rows {
                    let mut spans = lead
                        .take()
                        .unwrap_or_else(|| vec![Span::raw(" ".repeat(lead_width))]);
                    spans.extend(row);
                    self.push_row(spans);
                }
                start..self.lines.len()
            }
            _ => {
                let mut spans = lead;
                spans.extend(body);
                self.push_text(spans)
            }
        }
    }
}
