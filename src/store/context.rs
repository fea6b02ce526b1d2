use super::PlayerStore;
use crate::episode::Episode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// The app-wide player store.
#[derive(Debug)]
pub struct PlayerContext {
    episode_list: Vec<Episode>,
    current_episode_index: Option<usize>,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
    rng: StdRng,
}

impl PlayerContext {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic shuffle for tests and reproducible sessions.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            episode_list: Vec::new(),
            current_episode_index: None,
            is_playing: false,
            is_looping: false,
            is_shuffling: false,
            rng,
        }
    }

    /// Play a single episode on its own.
    pub fn play(&mut self, episode: Episode) {
        debug!("Playing single episode '{}'", episode.title);
        self.episode_list = vec![episode];
        self.current_episode_index = Some(0);
        self.is_playing = true;
    }

    /// Replace the list and start at `index`.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) {
        debug!("Playing list of {} episodes from #{}", list.len(), index);
        self.current_episode_index = (index < list.len()).then_some(index);
        self.is_playing = self.current_episode_index.is_some();
        self.episode_list = list;
    }

    fn select(&mut self, index: usize) {
        self.current_episode_index = Some(index);
        // A fresh selection always starts playing, even if the last one was paused at its end
        self.is_playing = true;
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStore for PlayerContext {
    fn episode_list(&self) -> &[Episode] {
        &self.episode_list
    }

    fn current_episode_index(&self) -> Option<usize> {
        self.current_episode_index
    }

    fn is_playing(&self) -> bool {
        self.is_playing
    }

    fn is_looping(&self) -> bool {
        self.is_looping
    }

    fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    fn has_next(&self) -> bool {
        match self.current_episode_index {
            Some(index) => self.is_shuffling || index + 1 < self.episode_list.len(),
            None => false,
        }
    }

    fn has_previous(&self) -> bool {
        matches!(self.current_episode_index, Some(index) if index > 0)
    }

    fn play_next(&mut self) {
        let Some(index) = self.current_episode_index else {
            return;
        };

        if self.is_shuffling && !self.episode_list.is_empty() {
            let next = self.rng.gen_range(0..self.episode_list.len());
            debug!("Shuffle picked episode #{}", next);
            self.select(next);
        } else if index + 1 < self.episode_list.len() {
            self.select(index + 1);
        }
    }

    fn play_previous(&mut self) {
        if let Some(index) = self.current_episode_index {
            if index > 0 {
                self.select(index - 1);
            }
        }
    }

    fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
    }

    fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
    }

    fn set_playing_state(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    fn clear_player_state(&mut self) {
        debug!("Clearing player state");
        self.episode_list.clear();
        self.current_episode_index = None;
    }
}
