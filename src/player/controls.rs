// Transport controls - which buttons exist, which are pressable, which are lit

use crate::store::PlayerStore;

// Discriminants double as the position in the control bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Shuffle,
    Previous,
    PlayPause,
    Next,
    Loop,
}

impl Control {
    /// Left-to-right order in the control bar.
    pub const ALL: [Control; 5] = [
        Control::Shuffle,
        Control::Previous,
        Control::PlayPause,
        Control::Next,
        Control::Loop,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Control::Shuffle => "Shuffle",
            Control::Previous => "Play previous",
            Control::PlayPause => "Play",
            Control::Next => "Play next",
            Control::Loop => "Repeat",
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Logical icon names; the UI decides what each one looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    NowPlaying,
    Shuffle,
    PlayPrevious,
    Play,
    Pause,
    PlayNext,
    Repeat,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::NowPlaying => "♫",
            Icon::Shuffle => "🔀",
            Icon::PlayPrevious => "⏮",
            Icon::Play => "▶",
            Icon::Pause => "⏸",
            Icon::PlayNext => "⏭",
            Icon::Repeat => "🔁",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub control: Control,
    pub icon: Icon,
    pub enabled: bool,
    pub active: bool, // shuffle/loop highlight
}

/// Button states derived from the store.
pub fn control_states<S: PlayerStore + ?Sized>(store: &S) -> [ButtonState; 5] {
    Control::ALL.map(|control| button_state(store, control))
}

pub fn button_state<S: PlayerStore + ?Sized>(store: &S, control: Control) -> ButtonState {
    let has_episode = store.current_episode().is_some();

    let (icon, enabled, active) = match control {
        Control::Shuffle => (
            Icon::Shuffle,
            has_episode && store.episode_list().len() > 1,
            store.is_shuffling(),
        ),
        Control::Previous => (Icon::PlayPrevious, has_episode && store.has_previous(), false),
        Control::PlayPause => {
            let icon = if store.is_playing() { Icon::Pause } else { Icon::Play };
            (icon, has_episode, false)
        }
        Control::Next => (Icon::PlayNext, has_episode && store.has_next(), false),
        Control::Loop => (Icon::Repeat, has_episode, store.is_looping()),
    };

    ButtonState {
        control,
        icon,
        enabled,
        active,
    }
}

/// Forward a pressed control to the store. No local computation happens here.
pub(crate) fn dispatch<S: PlayerStore + ?Sized>(store: &mut S, control: Control) {
    match control {
        Control::Shuffle => store.toggle_shuffle(),
        Control::Previous => store.play_previous(),
        Control::PlayPause => store.toggle_play(),
        Control::Next => store.play_next(),
        Control::Loop => store.toggle_loop(),
    }
}
