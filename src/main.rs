use color_eyre::eyre::Result;
use crossterm::event::{Event, EventStream};
use futures::future::OptionFuture;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use sticker_diary::app::{start_save, Action, App, PendingSave};
use sticker_diary::config::Config;
use sticker_diary::controller::DiaryController;
use sticker_diary::diary_entry::DateKey;
use sticker_diary::diary_state::DiaryState;
use sticker_diary::editorial::{EditorialGenerator, OfflineGenerator};
use sticker_diary::gemini::GeminiClient;
use sticker_diary::logging;
use sticker_diary::storage::{FileStorage, StorageBackend};
use sticker_diary::ui::UI;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_env()?;
    logging::init(&config)?;
    info!(?config, "starting sticker diary");

    let store = DiaryState::load(FileStorage::new(&config.data_file));
    let generator: Arc<dyn EditorialGenerator> = match &config.api_key {
        Some(key) => Arc::new(GeminiClient::new(
            &config.api_base,
            key,
            &config.model,
            config.generation_timeout,
        )?),
        None => {
            info!("GEMINI_API_KEY not set, entries will be saved without editorials");
            Arc::new(OfflineGenerator)
        }
    };

    let mut app = App::new(DiaryController::new(store), DateKey::today().date());
    let mut ui = UI::new()?;
    let result = run(&mut app, &mut ui, generator, config.generation_timeout).await;
    info!("sticker diary closed");
    result
}

async fn run<B: StorageBackend>(
    app: &mut App<B>,
    ui: &mut UI,
    generator: Arc<dyn EditorialGenerator>,
    limit: Duration,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticks = tokio::time::interval(Duration::from_millis(250));
    let mut pending: Option<PendingSave> = None;

    loop {
        ui.draw(app)?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => match app.handle_key(key) {
                    Some(Action::Quit) if pending.is_some() => {
                        warn!("quit ignored while a save is in flight");
                    }
                    Some(Action::Quit) => break,
                    Some(Action::Save(ticket)) => {
                        pending = Some(start_save(ticket, Arc::clone(&generator), limit));
                    }
                    None => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => {
                    if pending.is_some() {
                        info!("input closed, finishing the save in flight");
                        app.drain_save(&mut pending).await;
                    }
                    break;
                }
            },
            Some((ticket, outcome)) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                pending = None;
                app.settle_save(ticket, outcome);
            }
            _ = ticks.tick() => {}
        }
    }

    Ok(())
}
