use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::app::App;
use crate::core::constants::{
    APP_TITLE, FOOTER_TAGLINE, INPUT_PLACEHOLDER, LOADING_LABEL, RETRY_PROMPT,
};
use crate::core::loading::LoadingState;
use crate::ui::layout::LayoutEngine;
use crate::ui::theme::Theme;

const ELLIPSIS_STEP: Duration = Duration::from_millis(400);

pub fn ui(f: &mut Frame, app: &mut App, on_option: Option<&dyn Fn(&str)>) {
    let theme = app.ui.theme.clone();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(Paragraph::new(header_lines(app, &theme)), chunks[0]);
    render_transcript(f, app, &theme, chunks[1], on_option);
    f.render_widget(
        Paragraph::new(status_line(app, &theme)).alignment(Alignment::Center),
        chunks[2],
    );
    render_input(f, app, &theme, chunks[3]);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(FOOTER_TAGLINE, theme.footer_style)))
            .alignment(Alignment::Center),
        chunks[4],
    );
}

fn header_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let (plain, accent) = match APP_TITLE.find("Cuarto") {
        Some(at) => APP_TITLE.split_at(at),
        None => (APP_TITLE, ""),
    };
    vec![
        Line::from(vec![
            Span::styled("● ", theme.title_accent_style),
            Span::styled(plain.to_string(), theme.title_style),
            Span::styled(accent.to_string(), theme.title_accent_style),
        ]),
        Line::from(Span::styled(
            format!(
                "{} · tema {} · Ctrl+T tema · Ctrl+N reiniciar · Ctrl+C salir",
                app.provider_label,
                theme.kind.as_str()
            ),
            theme.subtitle_style,
        )),
    ]
}

fn render_transcript(
    f: &mut Frame,
    app: &mut App,
    theme: &Theme,
    area: Rect,
    on_option: Option<&dyn Fn(&str)>,
) {
    let layout = LayoutEngine::layout_messages(
        app.conversation.messages(),
        theme,
        area.width as usize,
        on_option,
    );
    let total_rows = layout.lines.len();
    app.ui
        .set_transcript_layout(area, total_rows, layout.option_hotspots);

    let mut lines = layout.lines;
    if let Some(selected) = app.ui.selected_hotspot() {
        for row in selected.rows.clone() {
            if let Some(line) = lines.get_mut(row) {
                let highlighted = std::mem::take(line).patch_style(theme.option_selected_style);
                *line = highlighted;
            }
        }
    }

    let offset = u16::try_from(app.ui.scroll_offset).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

pub fn status_line(app: &App, theme: &Theme) -> Line<'static> {
    match app.loading {
        LoadingState::Loading => {
            let elapsed = app
                .ui
                .loading_started
                .map(|started| started.elapsed())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled("◆ ", theme.model_avatar_style),
                Span::styled(
                    format!("{LOADING_LABEL}{}", ellipsis(elapsed)),
                    theme.loading_style,
                ),
            ])
        }
        LoadingState::Error => Line::from(Span::styled(format!("⚠ {RETRY_PROMPT}"), theme.error_style)),
        LoadingState::Idle if app.ui.in_option_select() => Line::from(Span::styled(
            "Tab/↑/↓ elegir · Enter responder · Esc volver",
            theme.subtitle_style,
        )),
        LoadingState::Idle if !app.ui.option_hotspots.is_empty() => Line::from(Span::styled(
            "Tab para elegir una opción",
            theme.subtitle_style,
        )),
        LoadingState::Idle => Line::default(),
    }
}

/// Zero to three dots, advancing every step.
pub fn ellipsis(elapsed: Duration) -> &'static str {
    const FRAMES: [&str; 4] = ["", ".", "..", "..."];
    let step = (elapsed.as_millis() / ELLIPSIS_STEP.as_millis()) as usize;
    FRAMES[step % FRAMES.len()]
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style);
    let inner_width = area.width.saturating_sub(2) as usize;

    let loading = app.loading.is_loading();
    let input = &app.ui.input;
    let (content, style) = if input.is_empty() || loading {
        let style = if loading {
            theme.input_disabled_style
        } else {
            theme.input_placeholder_style
        };
        (INPUT_PLACEHOLDER.to_string(), style)
    } else {
        (input.text().to_string(), theme.input_text_style)
    };

    let cursor_column = input.cursor_column();
    let h_scroll = if inner_width > 0 && cursor_column >= inner_width {
        cursor_column + 1 - inner_width
    } else {
        0
    };
    let h_scroll = if input.is_empty() || loading { 0 } else { h_scroll };

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(content, style)))
            .block(block)
            .scroll((0, u16::try_from(h_scroll).unwrap_or(u16::MAX))),
        area,
    );

    if !loading && !app.ui.in_option_select() && inner_width > 0 {
        let x = (cursor_column - h_scroll).min(inner_width - 1) as u16;
        f.set_cursor_position((area.x + 1 + x, area.y + 1));
    }
}
