use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    // UI Events
    Quit,
    Tick,
    Render,

    // Transport
    TogglePlayPause,
    NextEpisode,
    PreviousEpisode,
    ToggleShuffle,
    ToggleLoop,

    // Seek slider
    SeekForward,
    SeekBackward,
    SeekStart,

    // Episode list
    Up,
    Down,
    Enter,

    ToggleTheme,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.recv().await
    }

    /// Spawn the key reader and the tick timer. Both stop once the app drops its receiver.
    pub fn start(&self, tick: Duration) {
        let keys = self.sender();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = read_terminal_events(&keys) {
                debug!("Terminal event reader stopped: {}", e);
            }
        });

        let ticks = self.sender();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                if ticks.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn read_terminal_events(sender: &mpsc::UnboundedSender<AppEvent>) -> Result<()> {
    while !sender.is_closed() {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let app_event = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_to_app_event(key),
            Event::Resize(_, _) => Some(AppEvent::Render),
            _ => None,
        };

        if let Some(app_event) = app_event {
            let _ = sender.send(app_event);
        }
    }
    Ok(())
}

pub fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),

        // Playback controls
        KeyCode::Char(' ') => Some(AppEvent::TogglePlayPause),
        KeyCode::Char('n') => Some(AppEvent::NextEpisode),
        KeyCode::Char('b') => Some(AppEvent::PreviousEpisode),
        KeyCode::Char('z') => Some(AppEvent::ToggleShuffle),
        KeyCode::Char('r') => Some(AppEvent::ToggleLoop),

        // Seeking
        KeyCode::Right => Some(AppEvent::SeekForward),
        KeyCode::Left => Some(AppEvent::SeekBackward),
        KeyCode::Home => Some(AppEvent::SeekStart),

        // Navigation
        KeyCode::Up => Some(AppEvent::Up),
        KeyCode::Down => Some(AppEvent::Down),
        KeyCode::Enter => Some(AppEvent::Enter),

        KeyCode::Char('t') => Some(AppEvent::ToggleTheme),

        _ => None,
    }
}
