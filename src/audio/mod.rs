// Playback devices - the only thing in podpipe that actually makes sound
// A device is mounted per episode and reports back through an event channel

#[cfg(feature = "audio")]
pub mod rodio_device;
pub mod silent;

#[cfg(feature = "audio")]
pub use rodio_device::RodioDeviceFactory;
pub use silent::{SilentDevice, SilentDeviceFactory};

use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
    pub silent: bool, // clock-only playback, no output stream
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            silent: false,
        }
    }
}

impl From<crate::config::AudioSettings> for AudioConfig {
    fn from(settings: crate::config::AudioSettings) -> Self {
        Self {
            volume: settings.volume.clamp(0.0, 1.0),
            silent: settings.silent,
        }
    }
}

/// What a mounted device tells the player about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    MetadataReady,
    TimeUpdate,
    Ended,
    Played,
    Paused,
}

/// Sending half of a device's event channel.
///
/// Once the player drops the receiving half every emit becomes a no-op,
/// which is how listeners go away together with the device.
#[derive(Debug, Clone)]
pub struct DeviceEvents {
    sender: mpsc::UnboundedSender<DeviceEvent>,
}

impl DeviceEvents {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: DeviceEvent) {
        let _ = self.sender.send(event);
    }

    pub fn is_detached(&self) -> bool {
        self.sender.is_closed()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    #[error("Remote media is not supported: {0}")]
    UnsupportedSource(String),

    #[error("Failed to open media '{path}': {message}")]
    Open { path: String, message: String },

    #[error("Failed to decode media '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Seek failed: {0}")]
    Seek(String),
}

/// Everything needed to mount one device for one episode.
#[derive(Debug, Clone)]
pub struct MountRequest<'a> {
    pub source: &'a str,
    pub duration: u64, // seconds, as advertised by the catalog
    pub autoplay: bool,
    pub looping: bool,
}

/// A controllable audio source bound to a single episode.
pub trait PlaybackDevice {
    /// Playback clock in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: u64) -> Result<(), DeviceError>;
    fn play(&mut self) -> Result<(), DeviceError>;
    fn pause(&mut self);
    fn set_looping(&mut self, looping: bool);
    /// Advance the clock and emit time-update / end-of-media events.
    fn tick(&mut self);
}

pub trait DeviceFactory {
    fn mount(
        &mut self,
        request: MountRequest<'_>,
        events: DeviceEvents,
    ) -> Result<Box<dyn PlaybackDevice>, DeviceError>;
}

/// Local path for a media source; remote urls are rejected.
pub fn local_media_path(source: &str) -> Result<std::path::PathBuf, DeviceError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Err(DeviceError::UnsupportedSource(source.to_string()));
    }

    let path = source.strip_prefix("file://").unwrap_or(source);
    Ok(std::path::PathBuf::from(path))
}

/// Pick the device backend the config asks for.
pub fn default_factory(config: &AudioConfig) -> Result<Box<dyn DeviceFactory>, DeviceError> {
    if config.silent {
        return Ok(Box::new(SilentDeviceFactory::default()));
    }
    output_factory(config)
}

#[cfg(feature = "audio")]
fn output_factory(config: &AudioConfig) -> Result<Box<dyn DeviceFactory>, DeviceError> {
    Ok(Box::new(RodioDeviceFactory::new(config)?))
}

#[cfg(not(feature = "audio"))]
fn output_factory(_config: &AudioConfig) -> Result<Box<dyn DeviceFactory>, DeviceError> {
    tracing::warn!("Built without the `audio` feature, falling back to silent playback");
    Ok(Box::new(SilentDeviceFactory::default()))
}
