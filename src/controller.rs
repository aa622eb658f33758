//! Navigation between the cover, the calendar and a single entry, and the
//! save path that commits a draft.

use crate::diary_entry::{DateKey, DiaryEntry};
use crate::diary_state::DiaryState;
use crate::draft::Draft;
use crate::editorial::{curate, EditorialGenerator, EditorialOutcome};
use crate::errors::StoreError;
use crate::storage::StorageBackend;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Cover,
    Calendar,
    Entry(DateKey),
}

/// Proof that a save is in flight, carrying the draft as it was when the
/// save started. Only [`DiaryController::begin_save`] creates one.
#[derive(Debug)]
pub struct SaveTicket {
    key: DateKey,
    draft: Draft,
}

impl SaveTicket {
    pub fn key(&self) -> DateKey {
        self.key
    }

    pub fn content(&self) -> &str {
        &self.draft.content
    }

    pub fn mood(&self) -> &str {
        &self.draft.mood
    }
}

pub struct DiaryController<B: StorageBackend> {
    store: DiaryState<B>,
    view: View,
    draft: Option<Draft>,
    saving: bool,
    last_error: Option<String>,
}

impl<B: StorageBackend> DiaryController<B> {
    pub fn new(store: DiaryState<B>) -> Self {
        DiaryController {
            store,
            view: View::Cover,
            draft: None,
            saving: false,
            last_error: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn store(&self) -> &DiaryState<B> {
        &self.store
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// The draft, unless a save has frozen it.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        if self.saving {
            None
        } else {
            self.draft.as_mut()
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Message of the last failed save, cleared by the next transition.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The stored record for the date being edited, if any.
    pub fn current_entry(&self) -> Option<&DiaryEntry> {
        match self.view {
            View::Entry(key) => self.store.get(&key),
            _ => None,
        }
    }

    pub fn open_calendar(&mut self) -> bool {
        if self.view != View::Cover {
            return self.ignored("open_calendar");
        }
        self.view = View::Calendar;
        debug!("cover -> calendar");
        true
    }

    pub fn return_to_cover(&mut self) -> bool {
        if self.view != View::Calendar {
            return self.ignored("return_to_cover");
        }
        self.view = View::Cover;
        debug!("calendar -> cover");
        true
    }

    pub fn select_date(&mut self, key: DateKey) -> bool {
        if self.view != View::Calendar {
            return self.ignored("select_date");
        }
        self.draft = Some(Draft::for_date(key, self.store.get(&key)));
        self.last_error = None;
        self.view = View::Entry(key);
        debug!(date = %key, "calendar -> entry");
        true
    }

    /// Leaves the entry view, dropping the draft. Not allowed mid-save.
    pub fn back_to_calendar(&mut self) -> bool {
        if !matches!(self.view, View::Entry(_)) || self.saving {
            return self.ignored("back_to_calendar");
        }
        self.leave_entry();
        debug!("entry -> calendar, draft discarded");
        true
    }

    /// Marks a save in flight and snapshots the draft.
    ///
    /// Returns `None` when no date is selected or a save is already running.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        let key = match self.view {
            View::Entry(key) if !self.saving => key,
            _ => {
                self.ignored("begin_save");
                return None;
            }
        };
        let draft = self.draft.clone()?;

        self.saving = true;
        self.last_error = None;
        info!(date = %key, "save started");
        Some(SaveTicket { key, draft })
    }

    /// Commits the ticket's draft with whatever editorial was obtained.
    ///
    /// On success the view returns to the calendar. On a storage failure the
    /// view and draft stay as they were and the previous record is untouched.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        outcome: EditorialOutcome,
    ) -> Result<(), StoreError> {
        let SaveTicket { key, draft } = ticket;
        let enriched = matches!(outcome, EditorialOutcome::Enriched(_));
        let record = draft.into_entry(key, outcome.into_editorial());

        let result = self.store.upsert(key, record);
        self.saving = false;

        match result {
            Ok(()) => {
                info!(date = %key, enriched, "entry saved");
                if self.view == View::Entry(key) {
                    self.leave_entry();
                }
                Ok(())
            }
            Err(e) => {
                warn!(date = %key, error = %e, "save failed, draft kept");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs the whole save inline. Returns `Ok(false)` if the save was
    /// refused by its preconditions.
    pub async fn save(
        &mut self,
        generator: &dyn EditorialGenerator,
        limit: Duration,
    ) -> Result<bool, StoreError> {
        let Some(ticket) = self.begin_save() else {
            return Ok(false);
        };
        let outcome = curate(generator, ticket.content(), ticket.mood(), limit).await;
        self.finish_save(ticket, outcome)?;
        Ok(true)
    }

    fn leave_entry(&mut self) {
        self.draft = None;
        self.last_error = None;
        self.view = View::Calendar;
    }

    fn ignored(&self, action: &str) -> bool {
        debug!(action, view = ?self.view, saving = self.saving, "transition ignored");
        false
    }
}
