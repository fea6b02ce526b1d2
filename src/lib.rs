// podpipe library - a terminal podcast player
// The player panel is the heart of it; everything else feeds it

pub mod audio;    // playback devices (rodio or silent clock)
pub mod config;   // settings and preferences
pub mod episode;  // episodes and the catalog they come from
pub mod player;   // the player view: slider, transport, device sync
pub mod store;    // shared playback state
pub mod theme;    // light/dark colours
#[cfg(feature = "tui")]
pub mod ui;       // terminal interface

// Export the stuff other modules actually use
pub use audio::{DeviceEvent, DeviceFactory, PlaybackDevice};
pub use config::Config;
pub use episode::Episode;
pub use player::{Control, PlayerError, PlayerSnapshot, PlayerView};
pub use store::{PlayerContext, PlayerStore};
pub use theme::ThemeStore;
