//! Key handling on top of the controller: which field has focus, where the
//! cursors are, which day the calendar points at.

use crate::calendar::{shift_days, shift_months};
use crate::controller::{DiaryController, SaveTicket, View};
use crate::diary_entry::DateKey;
use crate::editorial::{curate, EditorialGenerator, EditorialOutcome};
use crate::stickers::STICKERS;
use crate::storage::StorageBackend;
use crate::text_input;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Reflection,
    Mood,
    Image,
    Stickers,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Reflection => Field::Mood,
            Field::Mood => Field::Image,
            Field::Image => Field::Stickers,
            Field::Stickers => Field::Reflection,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Reflection => Field::Stickers,
            Field::Mood => Field::Reflection,
            Field::Image => Field::Mood,
            Field::Stickers => Field::Image,
        }
    }
}

/// What the event loop has to do after a key press.
#[derive(Debug)]
pub enum Action {
    Save(SaveTicket),
    Quit,
}

/// A save whose editorial request is still running.
pub type PendingSave = BoxFuture<'static, (SaveTicket, EditorialOutcome)>;

/// Starts the editorial request for `ticket` without waiting on it.
pub fn start_save(
    ticket: SaveTicket,
    generator: Arc<dyn EditorialGenerator>,
    limit: Duration,
) -> PendingSave {
    async move {
        let outcome = curate(generator.as_ref(), ticket.content(), ticket.mood(), limit).await;
        (ticket, outcome)
    }
    .boxed()
}

pub struct App<B: StorageBackend> {
    pub controller: DiaryController<B>,
    pub calendar_cursor: NaiveDate,
    pub focus: Field,
    pub reflection_cursor: usize,
    pub mood_cursor: usize,
    pub image_cursor: usize,
    pub palette_index: usize,
    pub placed_index: usize,
}

impl<B: StorageBackend> App<B> {
    pub fn new(controller: DiaryController<B>, today: NaiveDate) -> Self {
        App {
            controller,
            calendar_cursor: today,
            focus: Field::Reflection,
            reflection_cursor: 0,
            mood_cursor: 0,
            image_cursor: 0,
            palette_index: 0,
            placed_index: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match self.controller.view() {
            View::Cover => self.on_cover(key),
            View::Calendar => self.on_calendar(key),
            View::Entry(_) => self.on_entry(key),
        }
    }

    /// Records a finished save. Returns whether the entry was written.
    pub fn settle_save(&mut self, ticket: SaveTicket, outcome: EditorialOutcome) -> bool {
        match self.controller.finish_save(ticket, outcome) {
            Ok(()) => true,
            Err(e) => {
                // already logged and shown by the controller
                debug!(error = %e, "save left the draft open");
                false
            }
        }
    }

    /// Waits for the in-flight save, if any, and records it.
    pub async fn drain_save(&mut self, pending: &mut Option<PendingSave>) -> bool {
        match pending.take() {
            Some(save) => {
                let (ticket, outcome) = save.await;
                self.settle_save(ticket, outcome)
            }
            None => false,
        }
    }

    fn on_cover(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.controller.open_calendar();
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }

    fn on_calendar(&mut self, key: KeyEvent) -> Option<Action> {
        let cursor = self.calendar_cursor;
        self.calendar_cursor = match key.code {
            KeyCode::Left => shift_days(cursor, -1),
            KeyCode::Right => shift_days(cursor, 1),
            KeyCode::Up => shift_days(cursor, -7),
            KeyCode::Down => shift_days(cursor, 7),
            KeyCode::PageUp | KeyCode::Char('[') => shift_months(cursor, -1),
            KeyCode::PageDown | KeyCode::Char(']') => shift_months(cursor, 1),
            KeyCode::Char('t') => DateKey::today().date(),
            KeyCode::Enter => {
                if self.controller.select_date(DateKey::from_date(cursor)) {
                    self.reset_entry_cursors();
                }
                cursor
            }
            KeyCode::Esc => {
                self.controller.return_to_cover();
                cursor
            }
            KeyCode::Char('q') => return Some(Action::Quit),
            _ => cursor,
        };
        None
    }

    fn reset_entry_cursors(&mut self) {
        let Some(draft) = self.controller.draft() else {
            return;
        };
        self.focus = Field::Reflection;
        self.reflection_cursor = draft.content.chars().count();
        self.mood_cursor = draft.mood.chars().count();
        self.image_cursor = draft.image_url.chars().count();
        self.palette_index = 0;
        self.placed_index = 0;
    }

    fn on_entry(&mut self, key: KeyEvent) -> Option<Action> {
        if self.controller.is_saving() {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                return self.controller.begin_save().map(Action::Save);
            }
            KeyCode::Esc => {
                self.controller.back_to_calendar();
                return None;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return None;
            }
            _ => {}
        }
        if ctrl {
            return None;
        }

        let focus = self.focus;
        let draft = self.controller.draft_mut()?;
        let (text, cursor, multiline) = match focus {
            Field::Reflection => (&mut draft.content, &mut self.reflection_cursor, true),
            Field::Mood => (&mut draft.mood, &mut self.mood_cursor, false),
            Field::Image => (&mut draft.image_url, &mut self.image_cursor, false),
            Field::Stickers => {
                match key.code {
                    KeyCode::Left => {
                        self.palette_index = self.palette_index.saturating_sub(1);
                    }
                    KeyCode::Right => {
                        self.palette_index = (self.palette_index + 1).min(STICKERS.len() - 1);
                    }
                    KeyCode::Enter => {
                        if let Some(sticker) = STICKERS.get(self.palette_index) {
                            draft.add_sticker(sticker.emoji);
                        }
                    }
                    KeyCode::Up => {
                        self.placed_index = self.placed_index.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if self.placed_index + 1 < draft.stickers.len() {
                            self.placed_index += 1;
                        }
                    }
                    KeyCode::Backspace | KeyCode::Delete => {
                        draft.remove_sticker(self.placed_index);
                        if self.placed_index >= draft.stickers.len() {
                            self.placed_index = draft.stickers.len().saturating_sub(1);
                        }
                    }
                    _ => {}
                }
                return None;
            }
        };

        match key.code {
            KeyCode::Char(c) => text_input::insert_char(text, cursor, c),
            KeyCode::Enter if multiline => text_input::insert_char(text, cursor, '\n'),
            KeyCode::Backspace => text_input::backspace(text, cursor),
            KeyCode::Delete => text_input::delete(text, *cursor),
            KeyCode::Left => text_input::move_left(cursor),
            KeyCode::Right => text_input::move_right(text, cursor),
            KeyCode::Home => *cursor = 0,
            KeyCode::End => text_input::move_end(text, cursor),
            KeyCode::Up if multiline => text_input::move_up(text, cursor),
            KeyCode::Down if multiline => text_input::move_down(text, cursor),
            _ => {}
        }
        None
    }
}
