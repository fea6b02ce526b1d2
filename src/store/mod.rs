// Shared player state - episode list, selection and the three playback flags
// The player view only ever reads this and calls operations on it

mod context;

pub use context::PlayerContext;

use crate::episode::Episode;

/// Everything the player view needs from the shared store.
///
/// Fields are read through accessors and only ever changed through the
/// operations, never poked directly.
pub trait PlayerStore {
    fn episode_list(&self) -> &[Episode];
    fn current_episode_index(&self) -> Option<usize>;
    fn is_playing(&self) -> bool;
    fn is_looping(&self) -> bool;
    fn is_shuffling(&self) -> bool;
    fn has_next(&self) -> bool;
    fn has_previous(&self) -> bool;

    fn play_next(&mut self);
    fn play_previous(&mut self);
    fn toggle_play(&mut self);
    fn toggle_loop(&mut self);
    fn toggle_shuffle(&mut self);
    fn set_playing_state(&mut self, playing: bool);
    fn clear_player_state(&mut self);

    /// `episode_list[current_episode_index]`, or `None` when nothing valid is selected.
    fn current_episode(&self) -> Option<&Episode> {
        self.current_episode_index()
            .and_then(|index| self.episode_list().get(index))
    }
}
