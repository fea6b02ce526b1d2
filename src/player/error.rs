use super::Control;
use crate::audio::DeviceError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerError {
    #[error("No episode selected")]
    NoEpisode,

    #[error("Cannot seek to {requested}s, episode is {duration}s long")]
    SeekOutOfRange { requested: u64, duration: u64 },

    #[error("{0} is not available right now")]
    ControlDisabled(Control),

    #[error(transparent)]
    Device(#[from] DeviceError),
}
