// The player panel - episode info, seek slider and transport controls
// Keeps the displayed position and the device in step with the shared store

pub mod controls;
mod error;
pub mod time_format;
mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use controls::{control_states, ButtonState, Control, Icon};
pub use error::PlayerError;
pub use time_format::format_seconds;
pub use view::{NowPlaying, PlayerSnapshot, PlayerView, SliderModel, EMPTY_MESSAGE, HEADER_LABEL};
