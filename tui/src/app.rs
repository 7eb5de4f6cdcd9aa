//! Full-screen front end hosting the search box and the "web size" stepper.
//!
//! The [`App`] plays the parent role: it owns the similar-artists limit and the last selected
//! artist, and commits every intent the widgets emit. After each terminal event the pending app
//! events are drained before the next one is read, so a size intent is always applied before the
//! following gesture reads the current value.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use artist_search_lookup::LookupGateway;
use artist_search_protocol::ArtistMbid;
use artist_search_protocol::SearchOutcome;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::StreamExt;
use unicode_width::UnicodeWidthStr;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::exit::AppExitInfo;
use crate::exit::ExitReason;
use crate::search_box::SearchBox;
use crate::search_box::SearchBoxParams;
use crate::size_stepper::SizeStepper;
use crate::terminal_cleanup::TerminalGuard;

pub struct AppConfig {
    pub gateway: Arc<dyn LookupGateway>,
    pub throttle_window: Duration,
    pub blur_grace: Duration,
    pub lookup_timeout: Duration,
    /// Initial value of the parent-owned similar-artists limit.
    pub similar_artists_limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    SearchInput,
    SizeStepper,
}

struct App {
    search_box: SearchBox,
    size_stepper: SizeStepper,
    focus: Focus,
    /// Digits typed into the size field but not yet committed with Enter.
    size_draft: Option<String>,
    similar_artists_limit: i64,
    selected_artist: Option<ArtistMbid>,
    status: Option<String>,
}

pub async fn run_artist_search(config: AppConfig) -> anyhow::Result<AppExitInfo> {
    let (app_event_tx_raw, mut app_event_rx) = unbounded_channel::<AppEvent>();
    let app_event_tx = AppEventSender::new(app_event_tx_raw);
    let mut app = App::new(config, app_event_tx);

    let mut guard = TerminalGuard::enter().context("failed to initialize terminal")?;
    let mut terminal_events = EventStream::new();
    app.search_box.on_focus();

    let exit_reason = loop {
        guard
            .terminal_mut()
            .draw(|frame| app.render(frame))
            .context("failed to draw frame")?;

        tokio::select! {
            maybe_event = terminal_events.next() => {
                let Some(event) = maybe_event else {
                    break ExitReason::InputClosed;
                };
                let event = event.context("failed to read terminal event")?;
                if let Some(reason) = app.handle_terminal_event(event) {
                    break reason;
                }
                app.drain_app_events(&mut app_event_rx);
            }
            Some(app_event) = app_event_rx.recv() => {
                app.handle_app_event(app_event);
            }
        }
    };

    guard.restore().context("failed to restore terminal")?;
    tracing::info!(?exit_reason, "artist search session finished");
    Ok(AppExitInfo {
        outcome: app.outcome(),
        exit_reason,
    })
}

impl App {
    fn new(config: AppConfig, app_event_tx: AppEventSender) -> Self {
        let AppConfig {
            gateway,
            throttle_window,
            blur_grace,
            lookup_timeout,
            similar_artists_limit,
        } = config;

        let mut params = SearchBoxParams::new(gateway, app_event_tx.clone());
        params.throttle_window = throttle_window;
        params.blur_grace = blur_grace;
        params.lookup_timeout = lookup_timeout;

        Self {
            search_box: SearchBox::new(params),
            size_stepper: SizeStepper::new(app_event_tx),
            focus: Focus::SearchInput,
            size_draft: None,
            similar_artists_limit,
            selected_artist: None,
            status: None,
        }
    }

    fn outcome(&self) -> SearchOutcome {
        SearchOutcome {
            selected_artist: self.selected_artist.clone(),
            similar_artists_limit: self.similar_artists_limit,
        }
    }

    fn drain_app_events(&mut self, rx: &mut UnboundedReceiver<AppEvent>) {
        while let Ok(app_event) = rx.try_recv() {
            self.handle_app_event(app_event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ThrottleWindowElapsed { window } => {
                self.search_box.on_throttle_window_elapsed(window);
            }
            AppEvent::LookupCompleted { seq, query, result } => {
                self.search_box.on_lookup_completed(seq, &query, result);
            }
            AppEvent::BlurGraceElapsed { timer } => {
                self.search_box.on_blur_grace_elapsed(timer);
            }
            AppEvent::ArtistSelected(id) => {
                tracing::info!(artist = %id, "selected artist");
                self.status = Some(format!("Selected artist {id}"));
                self.selected_artist = Some(id);
            }
            AppEvent::SimilarArtistsLimitChanged(value) => {
                self.similar_artists_limit = value;
            }
        }
    }

    fn handle_terminal_event(&mut self, event: Event) -> Option<ExitReason> {
        match event {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                self.handle_key_event(key_event)
            }
            Event::FocusGained if self.focus == Focus::SearchInput => {
                self.search_box.on_focus();
                None
            }
            Event::FocusLost if self.focus == Focus::SearchInput => {
                self.search_box.on_blur();
                None
            }
            Event::Paste(pasted) if self.focus == Focus::SearchInput => {
                let mut text = self.search_box.query_text();
                text.push_str(&pasted.replace(['\r', '\n'], " "));
                self.search_box.on_query_change(text);
                None
            }
            _ => None,
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) -> Option<ExitReason> {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return Some(ExitReason::UserRequested);
        }

        if matches!(key_event.code, KeyCode::Tab | KeyCode::BackTab) {
            self.toggle_focus();
            return None;
        }

        match self.focus {
            Focus::SearchInput => self.handle_search_key(key_event),
            Focus::SizeStepper => self.handle_stepper_key(key_event),
        }
        None
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::SearchInput => {
                self.search_box.on_blur();
                Focus::SizeStepper
            }
            Focus::SizeStepper => {
                self.size_draft = None;
                self.search_box.on_focus();
                Focus::SearchInput
            }
        };
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char(ch) => {
                let mut text = self.search_box.query_text();
                text.push(ch);
                self.search_box.on_query_change(text);
            }
            KeyCode::Backspace => {
                let mut text = self.search_box.query_text();
                if text.pop().is_some() {
                    self.search_box.on_query_change(text);
                }
            }
            KeyCode::Up => self.search_box.move_selection_up(),
            KeyCode::Down => self.search_box.move_selection_down(),
            KeyCode::Enter => {
                self.search_box.select_highlighted();
            }
            KeyCode::Esc => self.search_box.request_close(),
            _ => {}
        }
    }

    fn handle_stepper_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('+') | KeyCode::Up | KeyCode::Right => {
                self.size_draft = None;
                self.size_stepper.increment(self.similar_artists_limit);
            }
            KeyCode::Char('-') | KeyCode::Down | KeyCode::Left => {
                self.size_draft = None;
                self.size_stepper.decrement(self.similar_artists_limit);
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                self.size_draft.get_or_insert_with(String::new).push(ch);
            }
            KeyCode::Backspace => {
                if let Some(draft) = self.size_draft.as_mut() {
                    draft.pop();
                }
            }
            KeyCode::Enter => {
                let draft = self.size_draft.take().unwrap_or_default();
                match self.size_stepper.set_direct_input(&draft) {
                    Ok(_) => self.status = None,
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            KeyCode::Esc => self.size_draft = None,
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let dropdown_height = if self.search_box.is_dropdown_open() {
            self.search_box.dropdown_height()
        } else {
            0
        };
        let [input_area, dropdown_area, _spacer, size_area, status_area, hint_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(dropdown_height),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        let search_focused = self.focus == Focus::SearchInput;
        let query = self.search_box.query_text();
        let input_block = Block::bordered()
            .title(" Artist name ")
            .border_style(focus_style(search_focused));
        let input_inner = input_block.inner(input_area);
        frame.render_widget(
            Paragraph::new(Line::from(query.clone())).block(input_block),
            input_area,
        );
        if search_focused {
            let cursor_x = input_inner
                .x
                .saturating_add(u16::try_from(query.width()).unwrap_or(u16::MAX))
                .min(input_inner.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, input_inner.y));
        }

        self.search_box.render_dropdown(
            Rect {
                x: dropdown_area.x.saturating_add(1),
                width: dropdown_area.width.saturating_sub(2),
                ..dropdown_area
            },
            frame.buffer_mut(),
        );

        frame.render_widget(Paragraph::new(self.size_line()), size_area);

        if let Some(status) = self.status.as_deref() {
            frame.render_widget(Paragraph::new(Line::from(status.to_string()).dim()), status_area);
        }
        frame.render_widget(Paragraph::new(hint_line()), hint_area);
    }

    fn size_line(&self) -> Line<'static> {
        let focused = self.focus == Focus::SizeStepper;
        let value = match self.size_draft.as_deref() {
            Some(draft) => format!("{draft}_"),
            None => self.similar_artists_limit.to_string(),
        };
        Line::from(vec![
            " Web size: ".into(),
            Span::styled("[-] ", focus_style(focused)),
            Span::from(value).bold(),
            Span::styled(" [+]", focus_style(focused)),
        ])
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::new().cyan()
    } else {
        Style::new().dim()
    }
}

fn hint_line() -> Line<'static> {
    Line::from(vec![
        " Tab".bold(),
        " switch field  ".dim(),
        "↑/↓".bold(),
        " move  ".dim(),
        "Enter".bold(),
        " choose  ".dim(),
        "Esc".bold(),
        " close  ".dim(),
        "Ctrl+C".bold(),
        " quit".dim(),
    ])
}
