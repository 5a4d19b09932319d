use std::ops::Range;
use std::time::Instant;

use ratatui::layout::{Position, Rect};
use ratatui::prelude::Size;

use crate::ui::theme::Theme;
use crate::utils::line_editor::{apply_line_edit_action, LineEditAction, LineEditorState};

/// An interactive option as laid out in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionHotspot {
    pub message_index: usize,
    /// Index into the bubble's own option list.
    pub option_index: usize,
    /// Absolute transcript rows, before scrolling.
    pub rows: Range<usize>,
}

/// Current UI interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Typing,
    /// Cycling through options; `selected` indexes the hotspot list.
    OptionSelect { selected: usize },
}

pub struct UiState {
    pub theme: Theme,
    pub input: LineEditorState,
    pub mode: UiMode,
    pub scroll_offset: usize,
    /// Follow new content at the bottom of the transcript.
    pub auto_scroll: bool,
    pub max_scroll: usize,
    pub transcript_area: Rect,
    pub option_hotspots: Vec<OptionHotspot>,
    pub last_term_size: Size,
    /// Set while a request is in flight; drives the loading animation.
    pub loading_started: Option<Instant>,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            input: LineEditorState::default(),
            mode: UiMode::Typing,
            scroll_offset: 0,
            auto_scroll: true,
            max_scroll: 0,
            transcript_area: Rect::default(),
            option_hotspots: Vec::new(),
            last_term_size: Size::default(),
            loading_started: None,
            exit_requested: false,
        }
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn edit_input(&mut self, edit: LineEditAction) -> bool {
        apply_line_edit_action(&mut self.input, edit)
    }

    pub fn scroll_by(&mut self, lines: i32) {
        let target = if lines < 0 {
            self.scroll_offset.saturating_sub(lines.unsigned_abs() as usize)
        } else {
            self.scroll_offset.saturating_add(lines as usize)
        };
        self.scroll_offset = target.min(self.max_scroll);
        self.auto_scroll = self.scroll_offset >= self.max_scroll;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = self.max_scroll;
    }

    /// Record the result of a transcript layout pass.
    pub fn set_transcript_layout(
        &mut self,
        area: Rect,
        total_rows: usize,
        hotspots: Vec<OptionHotspot>,
    ) {
        self.transcript_area = area;
        self.max_scroll = total_rows.saturating_sub(area.height as usize);
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }
        self.option_hotspots = hotspots;

        if let UiMode::OptionSelect { selected } = self.mode {
            if self.option_hotspots.is_empty() {
                self.mode = UiMode::Typing;
            } else if selected >= self.option_hotspots.len() {
                self.mode = UiMode::OptionSelect {
                    selected: self.option_hotspots.len() - 1,
                };
            }
        }
    }

    /// Enter option-select mode on the newest option.
    pub fn enter_option_select(&mut self) -> bool {
        match self.option_hotspots.len() {
            0 => false,
            len => {
                self.select_option(len - 1);
                true
            }
        }
    }

    pub fn exit_option_select(&mut self) {
        self.mode = UiMode::Typing;
    }

    pub fn in_option_select(&self) -> bool {
        matches!(self.mode, UiMode::OptionSelect { .. })
    }

    pub fn selected_option(&self) -> Option<usize> {
        match self.mode {
            UiMode::OptionSelect { selected } => Some(selected),
            UiMode::Typing => None,
        }
    }

    pub fn selected_hotspot(&self) -> Option<&OptionHotspot> {
        self.selected_option()
            .and_then(|index| self.option_hotspots.get(index))
    }

    pub fn select_option(&mut self, index: usize) {
        if index >= self.option_hotspots.len() {
            return;
        }
        self.mode = UiMode::OptionSelect { selected: index };
        self.scroll_rows_into_view(self.option_hotspots[index].rows.clone());
    }

    fn scroll_rows_into_view(&mut self, rows: Range<usize>) {
        let height = (self.transcript_area.height as usize).max(1);
        if rows.start < self.scroll_offset {
            self.scroll_offset = rows.start;
        } else if rows.end > self.scroll_offset + height {
            self.scroll_offset = rows.end.saturating_sub(height);
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        self.auto_scroll = self.scroll_offset >= self.max_scroll;
    }

    /// The option under a screen cell, if any.
    pub fn hotspot_at(&self, column: u16, row: u16) -> Option<&OptionHotspot> {
        let area = self.transcript_area;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let transcript_row = (row - area.y) as usize + self.scroll_offset;
        self.option_hotspots
            .iter()
            .find(|hotspot| hotspot.rows.contains(&transcript_row))
    }

    /// Return to the initial view after a session reset.
    pub fn reset_view(&mut self) {
        self.mode = UiMode::Typing;
        self.option_hotspots.clear();
        self.scroll_offset = 0;
        self.max_scroll = 0;
        self.auto_scroll = true;
    }
}
