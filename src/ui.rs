use crate::app::{App, Field};
use crate::calendar::month_grid;
use crate::controller::View;
use crate::diary_entry::DateKey;
use crate::stickers::STICKERS;
use crate::storage::StorageBackend;
use crate::text_input;
use color_eyre::Result;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

const PINK: Color = Color::Rgb(219, 39, 119);
const SOFT_PINK: Color = Color::Rgb(249, 168, 212);
const LIME: Color = Color::Rgb(190, 242, 100);
const DEEP_LIME: Color = Color::Rgb(63, 98, 18);

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    pub fn draw<B: StorageBackend>(&mut self, app: &App<B>) -> Result<()> {
        self.terminal.draw(|f| render(f, app))?;
        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

pub fn render<B: StorageBackend>(f: &mut Frame, app: &App<B>) {
    match app.controller.view() {
        View::Cover => render_cover(f),
        View::Calendar => render_calendar(f, app),
        View::Entry(key) => render_entry(f, app, key),
    }
}

fn title_style() -> Style {
    Style::default().fg(PINK).add_modifier(Modifier::BOLD)
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn render_cover(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "Gloss",
        title_style().add_modifier(Modifier::ITALIC),
    )))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(LIME)),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[1]);

    let collection = Paragraph::new("2026 Collection")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(collection, chunks[2]);

    let stickers: String = STICKERS
        .iter()
        .take(5)
        .map(|s| s.emoji)
        .collect::<Vec<_>>()
        .join("  ");
    f.render_widget(
        Paragraph::new(stickers).alignment(Alignment::Center),
        chunks[3],
    );

    f.render_widget(
        hint("Enter: Open the Archives, q: Quit"),
        chunks[5],
    );
}

fn render_calendar<B: StorageBackend>(f: &mut Frame, app: &App<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let cursor = app.calendar_cursor;
    let title = Paragraph::new(cursor.format("%B %Y").to_string())
        .style(title_style())
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let store = app.controller.store();
    let today = DateKey::today().date();
    let mut lines = vec![Line::from(
        ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|d| Span::styled(format!(" {d:^4} "), Style::default().fg(DEEP_LIME)))
            .collect::<Vec<_>>(),
    )];
    for week in month_grid(cursor) {
        let cells = week
            .iter()
            .map(|day| match day {
                None => Span::raw("      "),
                Some(date) => {
                    let key = DateKey::from_date(*date);
                    let mut style = Style::default();
                    if store.has_entry(&key) {
                        style = style.fg(Color::Black).bg(SOFT_PINK);
                    }
                    if *date == today {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if *date == cursor {
                        style = style.fg(Color::Black).bg(LIME).add_modifier(Modifier::BOLD);
                    }
                    Span::styled(format!(" {:^4} ", date.format("%-d")), style)
                }
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(""));
        lines.push(Line::from(cells));
    }

    let grid = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SOFT_PINK))
            .title(" The Archives "),
    );
    f.render_widget(grid, chunks[1]);

    let footer = Paragraph::new(format!("{} days archived", store.len()))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[2]);

    f.render_widget(
        hint("Arrows: Move, [ ]: Month, t: Today, Enter: Open day, Esc: Return to Cover, q: Quit"),
        chunks[3],
    );
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { PINK } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn render_entry<B: StorageBackend>(f: &mut Frame, app: &App<B>, key: DateKey) {
    let controller = &app.controller;
    let Some(draft) = controller.draft() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(key.long_label(), title_style())),
        Line::from(Span::styled(
            "EDITION 2026",
            Style::default().fg(DEEP_LIME).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Right);
    f.render_widget(heading, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(columns[0]);

    let placed: Vec<Span> = draft
        .stickers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if app.focus == Field::Stickers && i == app.placed_index {
                Span::styled(format!("[{s}]"), Style::default().bg(SOFT_PINK))
            } else {
                Span::raw(format!(" {s} "))
            }
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(placed)).block(field_block("Placed stickers", false)),
        left[0],
    );

    let focused = |field: Field| app.focus == field && !controller.is_saving();
    f.render_widget(
        Paragraph::new(draft.mood.as_str()).block(field_block("Today's Aura", focused(Field::Mood))),
        left[1],
    );
    f.render_widget(
        Paragraph::new(draft.image_url.as_str())
            .block(field_block("Image URL", focused(Field::Image))),
        left[2],
    );

    let palette: Vec<Line> = STICKERS
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if focused(Field::Stickers) && i == app.palette_index {
                Style::default().fg(Color::Black).bg(LIME)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{} {}", s.emoji, s.name), style))
        })
        .collect();
    f.render_widget(
        Paragraph::new(palette).block(field_block("Sticker palette", focused(Field::Stickers))),
        left[3],
    );

    let editorial = controller.current_entry().and_then(|e| e.editorial.as_ref());
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if editorial.is_some() {
            [Constraint::Min(6), Constraint::Length(8)]
        } else {
            [Constraint::Min(6), Constraint::Length(0)]
        })
        .split(columns[1]);

    let reflection_area = right[0];
    let (_, cursor_row) = text_input::display_position(&draft.content, app.reflection_cursor);
    let inner_height = reflection_area.height.saturating_sub(2);
    let scroll = cursor_row.saturating_sub(inner_height.saturating_sub(1));
    f.render_widget(
        Paragraph::new(draft.content.as_str())
            .scroll((scroll, 0))
            .block(field_block("Private Reflections", focused(Field::Reflection))),
        reflection_area,
    );

    if let Some(editorial) = editorial {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                editorial.headline.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                editorial.body.as_str(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SOFT_PINK))
                .title(Span::styled(
                    " AI Editor Picks ",
                    Style::default().fg(Color::Black).bg(LIME),
                )),
        );
        f.render_widget(card, right[1]);
    }

    let label = if controller.is_saving() {
        "Curating your memories..."
    } else if controller.current_entry().is_some() {
        "Update Legacy"
    } else {
        "Publish Day"
    };
    let mut status = vec![Span::styled(
        format!(" {label} "),
        Style::default().fg(Color::White).bg(PINK).add_modifier(Modifier::BOLD),
    )];
    if let Some(error) = controller.last_error() {
        status.push(Span::styled(
            format!("  Save failed: {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(status))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        rows[2],
    );

    f.render_widget(
        hint("Tab: Next field, Ctrl-S: Save, Esc: Back to Gallery"),
        rows[3],
    );

    if !controller.is_saving() {
        let (text, cursor, area) = match app.focus {
            Field::Reflection => (&draft.content, app.reflection_cursor, reflection_area),
            Field::Mood => (&draft.mood, app.mood_cursor, left[1]),
            Field::Image => (&draft.image_url, app.image_cursor, left[2]),
            Field::Stickers => return,
        };
        let (x, y) = text_input::display_position(text, cursor);
        let y = if app.focus == Field::Reflection { y.saturating_sub(scroll) } else { y };
        place_cursor(f, area, x, y);
    }
}

fn place_cursor(f: &mut Frame, area: Rect, x: u16, y: u16) {
    let inner_x = area.x.saturating_add(1).saturating_add(x);
    let inner_y = area.y.saturating_add(1).saturating_add(y);
    if inner_x < area.right().saturating_sub(1) && inner_y < area.bottom().saturating_sub(1) {
        f.set_cursor_position((inner_x, inner_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DiaryController;
    use crate::diary_state::DiaryState;
    use crate::editorial::{Editorial, EditorialOutcome};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn screen(app: &App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App<MemoryStorage> {
        let controller = DiaryController::new(DiaryState::load(MemoryStorage::new()));
        App::new(controller, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    #[test]
    fn cover_shows_the_collection() {
        let text = screen(&app());
        assert!(text.contains("2026 Collection"));
        assert!(text.contains("Open the Archives"));
    }

    #[test]
    fn calendar_shows_month_and_count() {
        let mut app = app();
        app.controller.open_calendar();
        let text = screen(&app);
        assert!(text.contains("March 2026"));
        assert!(text.contains("0 days archived"));
    }

    #[test]
    fn entry_view_switches_label_after_saving() {
        let mut app = app();
        let key: DateKey = "2026-03-14".parse().unwrap();
        app.controller.open_calendar();
        app.controller.select_date(key);
        assert!(screen(&app).contains("Publish Day"));

        let ticket = app.controller.begin_save().unwrap();
        assert!(screen(&app).contains("Curating your memories..."));
        let editorial = Editorial {
            headline: "Brunch Bliss".to_string(),
            body: "Iconic.".to_string(),
        };
        app.controller
            .finish_save(ticket, EditorialOutcome::Enriched(editorial))
            .unwrap();

        app.controller.select_date(key);
        let text = screen(&app);
        assert!(text.contains("Update Legacy"));
        assert!(text.contains("Brunch Bliss"));
        assert!(text.contains("March 14, 2026"));
    }
}
