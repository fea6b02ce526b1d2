// Fakes shared by the player tests: a scriptable store and a recording device

use crate::audio::{DeviceError, DeviceEvent, DeviceEvents, DeviceFactory, MountRequest, PlaybackDevice};
use crate::episode::Episode;
use crate::store::PlayerStore;
use std::cell::RefCell;
use std::rc::Rc;

pub fn episode(id: &str, duration: u64) -> Episode {
    Episode::new(id, format!("Episode {}", id), format!("/media/{}.mp3", id), duration)
        .with_members("Diego, Richard")
        .with_thumbnail(format!("/thumbs/{}.jpg", id))
}

/// Store whose flags are set directly; operations are logged.
#[derive(Debug, Default)]
pub struct StubStore {
    pub episode_list: Vec<Episode>,
    pub current_episode_index: Option<usize>,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub calls: Vec<&'static str>,
}

impl StubStore {
    pub fn with_episodes(episodes: Vec<Episode>, index: Option<usize>) -> Self {
        Self {
            episode_list: episodes,
            current_episode_index: index,
            ..Self::default()
        }
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.iter().any(|call| *call == name)
    }
}

impl PlayerStore for StubStore {
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
        self.has_next
    }

    fn has_previous(&self) -> bool {
        self.has_previous
    }

    fn play_next(&mut self) {
        self.calls.push("play_next");
        if let Some(index) = self.current_episode_index {
            if index + 1 < self.episode_list.len() {
                self.current_episode_index = Some(index + 1);
            }
        }
    }

    fn play_previous(&mut self) {
        self.calls.push("play_previous");
    }

    fn toggle_play(&mut self) {
        self.calls.push("toggle_play");
        self.is_playing = !self.is_playing;
    }

    fn toggle_loop(&mut self) {
        self.calls.push("toggle_loop");
        self.is_looping = !self.is_looping;
    }

    fn toggle_shuffle(&mut self) {
        self.calls.push("toggle_shuffle");
        self.is_shuffling = !self.is_shuffling;
    }

    fn set_playing_state(&mut self, playing: bool) {
        self.calls.push(if playing { "set_playing_state(true)" } else { "set_playing_state(false)" });
        self.is_playing = playing;
    }

    fn clear_player_state(&mut self) {
        self.calls.push("clear_player_state");
        self.episode_list.clear();
        self.current_episode_index = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetCurrentTime(u64),
    Play,
    Pause,
    SetLooping(bool),
}

/// What the fake devices saw, shared with the test.
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub mounts: Vec<String>,
    pub commands: Vec<Command>,
    pub time: f64,
    pub events: Option<DeviceEvents>,
    pub fail_mount: bool,
}

impl DeviceLog {
    pub fn plays(&self) -> usize {
        self.commands.iter().filter(|c| **c == Command::Play).count()
    }

    pub fn pauses(&self) -> usize {
        self.commands.iter().filter(|c| **c == Command::Pause).count()
    }

    /// Pretend the live device emitted `event` with its clock at `time`.
    pub fn emit_at(&mut self, time: f64, event: DeviceEvent) {
        self.time = time;
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

pub type SharedLog = Rc<RefCell<DeviceLog>>;

pub struct RecordingFactory {
    pub log: SharedLog,
}

impl RecordingFactory {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl DeviceFactory for RecordingFactory {
    fn mount(
        &mut self,
        request: MountRequest<'_>,
        events: DeviceEvents,
    ) -> Result<Box<dyn PlaybackDevice>, DeviceError> {
        let mut log = self.log.borrow_mut();
        if log.fail_mount {
            return Err(DeviceError::Open {
                path: request.source.to_string(),
                message: "missing".to_string(),
            });
        }

        log.mounts.push(request.source.to_string());
        log.time = 0.0;
        events.emit(DeviceEvent::MetadataReady);
        if request.autoplay {
            events.emit(DeviceEvent::Played);
        }
        log.events = Some(events);

        Ok(Box::new(RecordingDevice {
            log: Rc::clone(&self.log),
        }))
    }
}

pub struct RecordingDevice {
    log: SharedLog,
}

impl PlaybackDevice for RecordingDevice {
    fn current_time(&self) -> f64 {
        self.log.borrow().time
    }

    fn set_current_time(&mut self, seconds: u64) -> Result<(), DeviceError> {
        let mut log = self.log.borrow_mut();
        log.commands.push(Command::SetCurrentTime(seconds));
        log.time = seconds as f64;
        if let Some(events) = &log.events {
            events.emit(DeviceEvent::TimeUpdate);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        self.log.borrow_mut().commands.push(Command::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().commands.push(Command::Pause);
    }

    fn set_looping(&mut self, looping: bool) {
        self.log.borrow_mut().commands.push(Command::SetLooping(looping));
    }

    fn tick(&mut self) {}
}
