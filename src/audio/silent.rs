// Silent device - a playback clock with no audio output
// Handy on machines without a sound card and for driving the UI in tests

use super::{DeviceError, DeviceEvent, DeviceEvents, DeviceFactory, MountRequest, PlaybackDevice};
use std::time::{Duration, Instant};

pub struct SilentDevice {
    events: DeviceEvents,
    duration: f64,
    position: f64,
    playing: bool,
    looping: bool,
    ended: bool,
    last_tick: Instant,
}

impl SilentDevice {
    pub fn new(request: &MountRequest<'_>, events: DeviceEvents) -> Self {
        let mut device = Self {
            events,
            duration: request.duration as f64,
            position: 0.0,
            playing: false,
            looping: request.looping,
            ended: false,
            last_tick: Instant::now(),
        };

        device.events.emit(DeviceEvent::MetadataReady);
        if request.autoplay {
            device.start();
        }
        device
    }

    fn start(&mut self) {
        if !self.playing {
            self.playing = true;
            self.last_tick = Instant::now();
            self.events.emit(DeviceEvent::Played);
        }
    }

    /// Move the clock forward by `elapsed` of playback time.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }

        self.position += elapsed.as_secs_f64();
        if self.position >= self.duration {
            if self.looping && self.duration > 0.0 {
                self.position %= self.duration;
            } else {
                self.position = self.duration;
                self.playing = false;
                self.ended = true;
                self.events.emit(DeviceEvent::TimeUpdate);
                self.events.emit(DeviceEvent::Paused);
                self.events.emit(DeviceEvent::Ended);
                return;
            }
        }
        self.events.emit(DeviceEvent::TimeUpdate);
    }
}

impl PlaybackDevice for SilentDevice {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: u64) -> Result<(), DeviceError> {
        self.position = (seconds as f64).min(self.duration);
        self.ended = false;
        self.events.emit(DeviceEvent::TimeUpdate);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.ended {
            // Playing an ended media restarts it
            self.position = 0.0;
            self.ended = false;
        }
        self.start();
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.events.emit(DeviceEvent::Paused);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(elapsed);
    }
}

#[derive(Debug, Default)]
pub struct SilentDeviceFactory;

impl DeviceFactory for SilentDeviceFactory {
    fn mount(
        &mut self,
        request: MountRequest<'_>,
        events: DeviceEvents,
    ) -> Result<Box<dyn PlaybackDevice>, DeviceError> {
        Ok(Box::new(SilentDevice::new(&request, events)))
    }
}
