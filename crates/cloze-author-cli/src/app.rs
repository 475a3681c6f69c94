use anyhow::Result;
use cloze_author_engine::{
    AnnotationEngine, AnnotationError, SelectionEvent, SelectionOutcome, SpanId, io,
};
use ratatui::widgets::ListState;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sentence,
    Blanks,
}

pub struct App {
    pub engine: AnnotationEngine,
    pub path: PathBuf,
    /// Caret position in characters
    pub cursor: usize,
    /// Other end of the selection while Shift is held
    pub anchor: Option<usize>,
    pub focus: Focus,
    pub blank_list_state: ListState,
    pub status: String,
    pub dirty: bool,
}

impl App {
    pub fn new(engine: AnnotationEngine, path: PathBuf) -> Self {
        let mut app = Self {
            cursor: 0,
            engine,
            path,
            anchor: None,
            focus: Focus::Sentence,
            blank_list_state: ListState::default(),
            status: String::new(),
            dirty: false,
        };
        app.clamp_blank_selection();
        app
    }

    /// Selected character range, empty when nothing is selected
    pub fn selection(&self) -> (usize, usize) {
        match self.anchor {
            Some(anchor) => (anchor.min(self.cursor), anchor.max(self.cursor)),
            None => (self.cursor, self.cursor),
        }
    }

    pub fn move_cursor(&mut self, forward: bool, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        let len = self.engine.document().len();
        self.cursor = if forward {
            (self.cursor + 1).min(len)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    /// Underline the selection, or remove the underline it matches
    pub fn toggle_underline(&mut self) {
        let (start, end) = self.selection();
        if start == end {
            self.status = "Select some text first (Shift+←/→)".to_string();
            return;
        }

        let result = self
            .engine
            .document()
            .slice(start, end)
            .map(|text| SelectionEvent::new(start, end, text))
            .and_then(|event| self.engine.apply_selection(&event));
        match result {
            Ok(SelectionOutcome::Created(id)) => {
                self.status = format!("Added blank \"{}\"", self.blank_text(id));
                self.mark_changed();
                self.anchor = None;
            }
            Ok(SelectionOutcome::Removed(_)) => {
                self.status = "Removed blank".to_string();
                self.mark_changed();
                self.anchor = None;
            }
            Err(err) => self.report(err),
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        let (start, end) = self.selection();
        match self.engine.edit_text(start, end, text) {
            Ok(()) => {
                self.cursor = start + text.chars().count();
                self.anchor = None;
                self.mark_changed();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn delete_backward(&mut self) {
        let (start, end) = self.selection();
        if start == end && start == 0 {
            return;
        }
        let start = if start == end { start - 1 } else { start };
        self.delete_range(start, end);
    }

    pub fn delete_forward(&mut self) {
        let (start, end) = self.selection();
        let end = if start == end {
            (end + 1).min(self.engine.document().len())
        } else {
            end
        };
        if start < end {
            self.delete_range(start, end);
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sentence => Focus::Blanks,
            Focus::Blanks => Focus::Sentence,
        };
    }

    pub fn select_next_blank(&mut self) {
        let count = self.engine.registry().len();
        if count == 0 {
            return;
        }
        let i = match self.blank_list_state.selected() {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.blank_list_state.select(Some(i));
    }

    pub fn select_previous_blank(&mut self) {
        let count = self.engine.registry().len();
        if count == 0 {
            return;
        }
        let i = match self.blank_list_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.blank_list_state.select(Some(i));
    }

    pub fn toggle_selected_blank(&mut self) {
        let Some(id) = self.selected_blank() else {
            return;
        };
        let checked = self.engine.registry().is_checked(id).unwrap_or(false);
        match self.engine.toggle_checked(id, !checked) {
            Ok(()) => self.mark_changed(),
            Err(err) => self.report(err),
        }
    }

    pub fn delete_selected_blank(&mut self) {
        let Some(id) = self.selected_blank() else {
            return;
        };
        match self.engine.delete_span(id) {
            Ok(()) => {
                self.status = "Removed blank".to_string();
                self.mark_changed();
            }
            Err(err) => self.report(err),
        }
    }

    /// Move the selected blank one slot up or down the list
    pub fn shift_selected_blank(&mut self, down: bool) {
        let Some(index) = self.blank_list_state.selected() else {
            return;
        };
        let order = self.engine.registry().display_order();
        let target = if down {
            index + 1
        } else {
            match index.checked_sub(1) {
                Some(target) => target,
                None => return,
            }
        };
        let (Some(&id), Some(&over)) = (order.get(index), order.get(target)) else {
            return;
        };
        match self.engine.move_span(id, over) {
            Ok(()) => {
                self.blank_list_state.select(Some(target));
                self.mark_changed();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn save(&mut self) -> Result<()> {
        io::save_question(&self.path, &self.engine)?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        Ok(())
    }

    fn selected_blank(&self) -> Option<SpanId> {
        let index = self.blank_list_state.selected()?;
        self.engine.registry().display_order().get(index).copied()
    }

    fn blank_text(&self, id: SpanId) -> String {
        self.engine
            .registry()
            .get(id)
            .map(|span| span.text.clone())
            .unwrap_or_default()
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        match self.engine.edit_text(start, end, "") {
            Ok(()) => {
                self.cursor = start;
                self.anchor = None;
                self.mark_changed();
            }
            Err(err) => self.report(err),
        }
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        self.clamp_blank_selection();
    }

    fn clamp_blank_selection(&mut self) {
        let count = self.engine.registry().len();
        let selected = match self.blank_list_state.selected() {
            _ if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => Some(0),
        };
        self.blank_list_state.select(selected);
    }

    fn report(&mut self, err: AnnotationError) {
        if err.is_contract_violation() {
            log::error!("Annotation failed: {err}");
        }
        self.status = match err {
            AnnotationError::OverlappingSelection { .. } => {
                "That selection overlaps an existing blank".to_string()
            }
            AnnotationError::DuplicateAnnotation { text } => {
                format!("\"{text}\" is already a blank")
            }
            AnnotationError::EmptySelection { .. } => "Nothing to underline there".to_string(),
            other => other.to_string(),
        };
    }
}
