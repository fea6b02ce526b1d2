use super::controls::{button_state, control_states, dispatch, ButtonState, Control, Icon};
use super::time_format::format_seconds;
use super::PlayerError;
use crate::audio::{DeviceEvent, DeviceEvents, DeviceFactory, MountRequest, PlaybackDevice};
use crate::episode::Episode;
use crate::store::PlayerStore;
use crate::theme::{SliderPalette, ThemeStore};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

pub const HEADER_LABEL: &str = "Now playing";
pub const EMPTY_MESSAGE: &str = "Select a podcast to listen to";

// Which episode a device was mounted for
#[derive(Debug, Clone, PartialEq, Eq)]
struct MountKey {
    episode_id: String,
    source: String,
}

impl MountKey {
    fn for_episode(episode: &Episode) -> Self {
        Self {
            episode_id: episode.id.clone(),
            source: episode.url.clone(),
        }
    }
}

/// The live device plus its listeners. Dropping this tears both down.
struct MountedDevice {
    key: MountKey,
    device: Box<dyn PlaybackDevice>,
    events: UnboundedReceiver<DeviceEvent>,
    progress_attached: bool,
    looping: bool,
}

/// The player panel: one episode, one device, one scrub position.
///
/// The store is handed in on every call and never kept; the view only owns
/// the device and the displayed position.
pub struct PlayerView {
    factory: Box<dyn DeviceFactory>,
    scrub: u64,
    mounted: Option<MountedDevice>,
    failed_mount: Option<MountKey>,
    observed_playing: Option<bool>,
}

impl PlayerView {
    pub fn new(factory: Box<dyn DeviceFactory>) -> Self {
        Self {
            factory,
            scrub: 0,
            mounted: None,
            failed_mount: None,
            observed_playing: None,
        }
    }

    pub fn scrub_position(&self) -> u64 {
        self.scrub
    }

    pub fn has_device(&self) -> bool {
        self.mounted.is_some()
    }

    /// Bring the device in line with the store: mount, unmount, loop flag,
    /// then the play/pause reaction.
    pub fn reconcile<S: PlayerStore + ?Sized>(&mut self, store: &S) {
        match store.current_episode() {
            None => {
                if let Some(mounted) = self.mounted.take() {
                    debug!("Unmounting device for '{}'", mounted.key.episode_id);
                }
                self.failed_mount = None;
            }
            Some(episode) => {
                let key = MountKey::for_episode(episode);
                let stale = self.mounted.as_ref().map_or(true, |m| m.key != key);
                if stale {
                    self.mount(episode, key, store.is_looping());
                }

                if let Some(mounted) = self.mounted.as_mut() {
                    if mounted.looping != store.is_looping() {
                        mounted.looping = store.is_looping();
                        mounted.device.set_looping(mounted.looping);
                    }
                }
            }
        }

        self.sync_playing(store.is_playing());
    }

    fn mount(&mut self, episode: &Episode, key: MountKey, looping: bool) {
        // Old listeners go away before the new device can emit anything
        self.mounted = None;

        if self.failed_mount.as_ref() == Some(&key) {
            return;
        }

        let (events, receiver) = DeviceEvents::channel();
        let request = MountRequest {
            source: &episode.url,
            duration: episode.duration,
            autoplay: true,
            looping,
        };

        match self.factory.mount(request, events) {
            Ok(device) => {
                info!("Mounted device for '{}' ({})", episode.title, episode.url);
                self.failed_mount = None;
                self.mounted = Some(MountedDevice {
                    key,
                    device,
                    events: receiver,
                    progress_attached: false,
                    looping,
                });
            }
            Err(e) => {
                warn!("Could not mount '{}': {}", episode.url, e);
                self.failed_mount = Some(key);
            }
        }
    }

    // Runs once per change of `is_playing`, not once per reconcile
    fn sync_playing(&mut self, is_playing: bool) {
        if self.observed_playing == Some(is_playing) {
            return;
        }
        self.observed_playing = Some(is_playing);

        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };

        if is_playing {
            if let Err(e) = mounted.device.play() {
                warn!("Device refused to play: {}", e);
            }
        } else {
            mounted.device.pause();
        }
    }

    /// Advance the device clock and handle whatever it reported.
    pub fn pump<S: PlayerStore + ?Sized>(&mut self, store: &mut S) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.device.tick();
        }
        self.dispatch_device_events(store);
    }

    /// Handle queued device events in the order they were emitted.
    pub fn dispatch_device_events<S: PlayerStore + ?Sized>(&mut self, store: &mut S) {
        while let Some(event) = self.next_device_event() {
            self.handle_device_event(event, store);
        }
    }

    fn next_device_event(&mut self) -> Option<DeviceEvent> {
        self.mounted.as_mut().and_then(|m| m.events.try_recv().ok())
    }

    fn handle_device_event<S: PlayerStore + ?Sized>(&mut self, event: DeviceEvent, store: &mut S) {
        match event {
            DeviceEvent::MetadataReady => self.attach_progress_listener(),
            DeviceEvent::TimeUpdate => {
                let Some(mounted) = self.mounted.as_ref() else {
                    return;
                };
                if !mounted.progress_attached {
                    return;
                }

                let seconds = mounted.device.current_time().max(0.0).floor() as u64;
                self.scrub = match store.current_episode() {
                    Some(episode) => episode.clamp_position(seconds),
                    None => seconds,
                };
            }
            DeviceEvent::Ended => self.handle_playback_end(store),
            DeviceEvent::Played => store.set_playing_state(true),
            DeviceEvent::Paused => store.set_playing_state(false),
        }
    }

    // Every freshly loaded episode starts from the beginning
    fn attach_progress_listener(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };

        if let Err(e) = mounted.device.set_current_time(0) {
            warn!("Could not rewind '{}': {}", mounted.key.episode_id, e);
        }
        mounted.progress_attached = true;
        self.scrub = 0;
    }

    /// Jump to `amount` seconds into the current episode.
    pub fn seek<S: PlayerStore + ?Sized>(&mut self, amount: u64, store: &S) -> Result<(), PlayerError> {
        let episode = store.current_episode().ok_or(PlayerError::NoEpisode)?;
        if amount > episode.duration {
            return Err(PlayerError::SeekOutOfRange {
                requested: amount,
                duration: episode.duration,
            });
        }

        debug!("Seeking '{}' to {}s", episode.id, amount);
        self.scrub = amount;
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.device.set_current_time(amount)?;
        }
        Ok(())
    }

    /// Seek relative to the displayed position, clamped to the episode.
    pub fn seek_by<S: PlayerStore + ?Sized>(&mut self, delta: i64, store: &S) -> Result<(), PlayerError> {
        let duration = store
            .current_episode()
            .map(|e| e.duration)
            .ok_or(PlayerError::NoEpisode)?;

        let target = self.scrub.saturating_add_signed(delta).min(duration);
        self.seek(target, store)
    }

    /// The device ran out of media: advance if possible, otherwise stop everything.
    pub fn handle_playback_end<S: PlayerStore + ?Sized>(&mut self, store: &mut S) {
        if store.has_next() {
            let before = store.current_episode_index();
            info!("Episode finished, playing next");
            store.play_next();

            // Shuffle can land on the episode that just ended; its device will not remount
            if store.current_episode_index() == before {
                self.restart_current();
            }
        } else {
            info!("Episode finished, nothing left to play");
            self.scrub = 0;
            store.clear_player_state();
        }
    }

    fn restart_current(&mut self) {
        self.scrub = 0;
        if let Some(mounted) = self.mounted.as_mut() {
            if let Err(e) = mounted.device.set_current_time(0).and_then(|_| mounted.device.play()) {
                warn!("Could not restart '{}': {}", mounted.key.episode_id, e);
            }
        }
    }

    /// A transport button was pressed.
    pub fn press<S: PlayerStore + ?Sized>(&mut self, control: Control, store: &mut S) -> Result<(), PlayerError> {
        if !button_state(store, control).enabled {
            debug!("Ignoring disabled control {:?}", control);
            return Err(PlayerError::ControlDisabled(control));
        }

        dispatch(store, control);
        Ok(())
    }

    pub fn snapshot<S: PlayerStore + ?Sized>(&self, store: &S, theme: &ThemeStore) -> PlayerSnapshot {
        let episode = store.current_episode();

        let now_playing = match episode {
            Some(episode) => NowPlaying::Episode {
                title: episode.title.clone(),
                members: episode.display_members().to_string(),
                thumbnail: episode.thumbnail.clone(),
            },
            None => NowPlaying::Empty {
                message: EMPTY_MESSAGE,
            },
        };

        let slider = episode.map(|episode| SliderModel {
            max: episode.duration,
            value: self.scrub.min(episode.duration),
            palette: theme.slider_palette(),
        });

        PlayerSnapshot {
            header_icon: Icon::NowPlaying,
            header_label: HEADER_LABEL,
            now_playing,
            elapsed_label: format_seconds(self.scrub),
            total_label: format_seconds(episode.map_or(0, |e| e.duration)),
            slider,
            controls: control_states(store),
            empty: episode.is_none(),
            is_playing: store.is_playing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NowPlaying {
    Episode {
        title: String,
        members: String,
        thumbnail: String,
    },
    Empty {
        message: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderModel {
    pub max: u64,
    pub value: u64,
    pub palette: SliderPalette,
}

impl SliderModel {
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.value as f64 / self.max as f64
        }
    }
}

/// Everything the UI needs to draw the player for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub header_icon: Icon,
    pub header_label: &'static str,
    pub now_playing: NowPlaying,
    pub elapsed_label: String,
    pub total_label: String,
    pub slider: Option<SliderModel>, // None means an inert track
    pub controls: [ButtonState; 5],
    pub empty: bool,
    pub is_playing: bool,
}

impl PlayerSnapshot {
    pub fn control(&self, control: Control) -> ButtonState {
        self.controls[control as usize]
    }
}
