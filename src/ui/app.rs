use super::widgets::{render_episode_details, render_episode_list, render_player};
use super::{AppEvent, EventHandler, Screen};
use crate::audio::DeviceFactory;
use crate::config::Config;
use crate::episode::Episode;
use crate::player::{Control, PlayerError, PlayerView};
use crate::store::{PlayerContext, PlayerStore};
use crate::theme::ThemeStore;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
    Frame,
};
use std::time::Duration;
use tracing::{debug, info};

/// Everything that changes while the app runs, minus the terminal.
pub struct Session {
    pub episodes: Vec<Episode>,
    pub store: PlayerContext,
    pub view: PlayerView,
    pub theme: ThemeStore,
    pub list_state: ListState,
    pub status: Option<String>,
    pub should_quit: bool,
    seek_step: i64,
}

impl Session {
    pub fn new(
        episodes: Vec<Episode>,
        store: PlayerContext,
        factory: Box<dyn DeviceFactory>,
        theme: ThemeStore,
        seek_step_seconds: u64,
    ) -> Self {
        let mut list_state = ListState::default();
        if !episodes.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            episodes,
            store,
            view: PlayerView::new(factory),
            theme,
            list_state,
            status: None,
            should_quit: false,
            seek_step: i64::try_from(seek_step_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Apply one event; the player is reconciled with the store afterwards.
    pub fn handle_event(&mut self, event: AppEvent) {
        let outcome = match event {
            AppEvent::Quit => {
                self.should_quit = true;
                Ok(())
            }
            AppEvent::Tick => {
                self.view.pump(&mut self.store);
                Ok(())
            }
            AppEvent::Render => Ok(()),
            AppEvent::TogglePlayPause => self.view.press(Control::PlayPause, &mut self.store),
            AppEvent::NextEpisode => self.view.press(Control::Next, &mut self.store),
            AppEvent::PreviousEpisode => self.view.press(Control::Previous, &mut self.store),
            AppEvent::ToggleShuffle => self.view.press(Control::Shuffle, &mut self.store),
            AppEvent::ToggleLoop => self.view.press(Control::Loop, &mut self.store),
            AppEvent::SeekForward => self.view.seek_by(self.seek_step, &self.store),
            AppEvent::SeekBackward => self.view.seek_by(-self.seek_step, &self.store),
            AppEvent::SeekStart => self.view.seek(0, &self.store),
            AppEvent::Up => {
                self.move_selection(-1);
                Ok(())
            }
            AppEvent::Down => {
                self.move_selection(1);
                Ok(())
            }
            AppEvent::Enter => {
                self.play_selected();
                Ok(())
            }
            AppEvent::ToggleTheme => {
                self.theme.toggle();
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {}
            Err(e @ (PlayerError::ControlDisabled(_) | PlayerError::NoEpisode)) => {
                self.status = Some(e.to_string());
            }
            Err(e) => {
                info!("Player error: {}", e);
                self.status = Some(format!("❌ {}", e));
            }
        }

        self.view.reconcile(&self.store);
        // Device events raised by the reconcile (mount, play, pause) land right away
        self.view.dispatch_device_events(&mut self.store);
    }

    fn play_selected(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if let Some(episode) = self.episodes.get(selected) {
                info!("Playing '{}' from the episode list", episode.title);
                self.status = Some(format!("▶ {}", episode.title));
            }
            self.store.play_list(self.episodes.clone(), selected);
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.episodes.is_empty() {
            return;
        }

        let current = self.list_state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (current + delta as usize).min(self.episodes.len() - 1)
        };

        self.list_state.select(Some(new_index));
    }

    pub(super) fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(f.area());

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(5)])
            .split(chunks[0]);

        let playing_id = self.store.current_episode().map(|e| e.id.clone());
        render_episode_list(
            f,
            left[0],
            &self.episodes,
            playing_id.as_deref(),
            &mut self.list_state,
        );

        let highlighted = self.list_state.selected().and_then(|i| self.episodes.get(i));
        render_episode_details(f, left[1], highlighted);

        let snapshot = self.view.snapshot(&self.store, &self.theme);
        render_player(f, chunks[1], &snapshot, self.status.as_deref());
    }
}

pub struct App {
    screen: Screen,
    event_handler: EventHandler,
    tick: Duration,
    session: Session,
}

impl App {
    pub fn new(config: &Config, episodes: Vec<Episode>, factory: Box<dyn DeviceFactory>) -> Result<Self> {
        let screen = Screen::enter()?;
        let session = Session::new(
            episodes,
            PlayerContext::new(),
            factory,
            ThemeStore::new(config.ui.dark_theme),
            config.ui.seek_step_seconds,
        );

        Ok(Self {
            screen,
            event_handler: EventHandler::new(),
            tick: Duration::from_millis(config.ui.tick_ms.max(10)),
            session,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.event_handler.start(self.tick);
        info!("Player loop started with {} episodes", self.session.episodes.len());

        while !self.session.should_quit {
            self.screen.draw(&mut self.session)?;

            match self.event_handler.next_event().await {
                Some(event) => self.session.handle_event(event),
                None => break,
            }
        }

        debug!("Player loop finished");
        Ok(())
    }
}
