use super::{
    local_media_path, AudioConfig, DeviceError, DeviceEvent, DeviceEvents, DeviceFactory,
    MountRequest, PlaybackDevice,
};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// How far the sink clock may sit from a seek target and still count as caught up
const SEEK_SLACK: Duration = Duration::from_millis(250);
// Give up on the sink catching up after this long
const SEEK_TIMEOUT: Duration = Duration::from_secs(1);

/// Owns the output stream; every mounted device gets its own sink on it.
pub struct RodioDeviceFactory {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    volume: f32,
}

impl RodioDeviceFactory {
    pub fn new(config: &AudioConfig) -> Result<Self, DeviceError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| DeviceError::Output(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            volume: config.volume,
        })
    }
}

impl DeviceFactory for RodioDeviceFactory {
    fn mount(
        &mut self,
        request: MountRequest<'_>,
        events: DeviceEvents,
    ) -> Result<Box<dyn PlaybackDevice>, DeviceError> {
        let path = local_media_path(request.source)?;
        let sink = Sink::try_new(&self.stream_handle).map_err(|e| DeviceError::Output(e.to_string()))?;
        sink.set_volume(self.volume);

        let device = RodioDevice::open(sink, path, events, &request)?;
        Ok(Box::new(device))
    }
}

/// A seek the sink has accepted but not yet reflected in `get_pos`.
///
/// rodio copies the playback position in its audio callback before applying
/// a queued seek, so right after `try_seek` the sink still reports the old
/// time. Until it catches up the target is reported instead.
#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target: Duration,
    issued: Instant,
}

impl PendingSeek {
    fn new(target: Duration) -> Self {
        Self {
            target,
            issued: Instant::now(),
        }
    }

    fn settled(&self, reported: Duration) -> bool {
        let elapsed = self.issued.elapsed();
        if elapsed > SEEK_TIMEOUT {
            return true;
        }

        reported >= self.target.saturating_sub(SEEK_SLACK) && reported <= self.target + elapsed + SEEK_SLACK
    }
}

pub struct RodioDevice {
    sink: Sink,
    path: PathBuf,
    events: DeviceEvents,
    looping: bool,
    ended: bool,
    pending_seek: Option<PendingSeek>,
}

impl RodioDevice {
    /// Load `path` into `sink`, paused, and report the metadata.
    fn open(
        sink: Sink,
        path: PathBuf,
        events: DeviceEvents,
        request: &MountRequest<'_>,
    ) -> Result<Self, DeviceError> {
        sink.pause();
        sink.append(decode(&path)?);
        debug!("Loaded {} into a new sink", path.display());

        let mut device = Self {
            sink,
            path,
            events,
            looping: request.looping,
            ended: false,
            pending_seek: None,
        };

        device.events.emit(DeviceEvent::MetadataReady);
        if request.autoplay {
            device.play()?;
        }
        Ok(device)
    }

    // A drained sink has nothing left to seek in, so decode the file again
    fn reload(&mut self) -> Result<(), DeviceError> {
        self.sink.append(decode(&self.path)?);
        self.ended = false;
        // The old source's final position lingers until the new one is polled
        self.pending_seek = Some(PendingSeek::new(Duration::ZERO));
        Ok(())
    }

    fn position(&self) -> Duration {
        let reported = self.sink.get_pos();
        match self.pending_seek {
            Some(seek) if !seek.settled(reported) => seek.target,
            _ => reported,
        }
    }
}

impl PlaybackDevice for RodioDevice {
    fn current_time(&self) -> f64 {
        self.position().as_secs_f64()
    }

    fn set_current_time(&mut self, seconds: u64) -> Result<(), DeviceError> {
        if self.sink.empty() {
            self.reload()?;
        }

        let target = Duration::from_secs(seconds);
        self.sink
            .try_seek(target)
            .map_err(|e| DeviceError::Seek(e.to_string()))?;
        self.pending_seek = Some(PendingSeek::new(target));
        self.events.emit(DeviceEvent::TimeUpdate);
        Ok(())
    }

    fn play(&mut self) -> Result<(), DeviceError> {
        if self.sink.empty() {
            self.reload()?;
        }
        if self.sink.is_paused() {
            self.sink.play();
            self.events.emit(DeviceEvent::Played);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.sink.is_paused() {
            self.sink.pause();
            self.events.emit(DeviceEvent::Paused);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn tick(&mut self) {
        if let Some(seek) = self.pending_seek {
            if seek.settled(self.sink.get_pos()) {
                self.pending_seek = None;
            }
        }

        if self.ended || self.sink.is_paused() {
            return;
        }

        if self.sink.empty() {
            if self.looping {
                if let Err(e) = self.reload() {
                    warn!("Failed to restart looping episode: {}", e);
                    self.ended = true;
                    self.events.emit(DeviceEvent::Paused);
                    self.events.emit(DeviceEvent::Ended);
                    return;
                }
                self.events.emit(DeviceEvent::TimeUpdate);
            } else {
                self.ended = true;
                self.sink.pause();
                self.events.emit(DeviceEvent::TimeUpdate);
                self.events.emit(DeviceEvent::Paused);
                self.events.emit(DeviceEvent::Ended);
            }
            return;
        }

        self.events.emit(DeviceEvent::TimeUpdate);
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, DeviceError> {
    let file = File::open(path).map_err(|e| DeviceError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| DeviceError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::queue::SourcesQueueOutput;
    use std::io::Write;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;
    use tokio::sync::mpsc::UnboundedReceiver;

    const SAMPLE_RATE: u32 = 8000;
    // Samples pulled per millisecond of wall time, about ten times real speed
    const PULL_CHUNK: usize = 80;

    // Mono 16-bit PCM of a quiet square wave
    fn write_wav(path: &Path, seconds: f32) {
        let samples = (SAMPLE_RATE as f32 * seconds) as u32;
        let data_len = samples * 2;

        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for i in 0..samples {
            let sample: i16 = if (i / 20) % 2 == 0 { 1000 } else { -1000 };
            bytes.extend_from_slice(&sample.to_le_bytes());
        }

        let mut file = File::create(path).unwrap();
        file.write_all(&bytes).unwrap();
    }

    /// A device on an idle sink, with a thread standing in for the output stream.
    struct Harness {
        device: RodioDevice,
        receiver: UnboundedReceiver<DeviceEvent>,
        running: Arc<AtomicBool>,
        puller: Option<JoinHandle<()>>,
        _dir: TempDir,
    }

    impl Harness {
        fn new(seconds: f32, autoplay: bool, looping: bool) -> Self {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("episode.wav");
            write_wav(&path, seconds);

            let (sink, output) = Sink::new_idle();
            let running = Arc::new(AtomicBool::new(true));
            let puller = pull_samples(output, Arc::clone(&running));

            let (events, receiver) = DeviceEvents::channel();
            let source = path.display().to_string();
            let request = MountRequest {
                source: &source,
                duration: seconds.ceil() as u64,
                autoplay,
                looping,
            };
            let device = RodioDevice::open(sink, path.clone(), events, &request).unwrap();

            Self {
                device,
                receiver,
                running,
                puller: Some(puller),
                _dir: dir,
            }
        }

        fn drain(&mut self) -> Vec<DeviceEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.receiver.try_recv() {
                events.push(event);
            }
            events
        }

        // Tick like the UI does until `event` shows up
        fn tick_until(&mut self, event: DeviceEvent) -> Vec<DeviceEvent> {
            let deadline = Instant::now() + Duration::from_secs(5);
            let mut seen = Vec::new();
            while Instant::now() < deadline {
                self.device.tick();
                seen.extend(self.drain());
                if seen.contains(&event) {
                    return seen;
                }
                thread::sleep(Duration::from_millis(2));
            }
            panic!("device never reported {:?}, saw {:?}", event, seen);
        }

        fn tick_for(&mut self, wall: Duration) -> Vec<DeviceEvent> {
            let deadline = Instant::now() + wall;
            let mut seen = Vec::new();
            while Instant::now() < deadline {
                self.device.tick();
                seen.extend(self.drain());
                thread::sleep(Duration::from_millis(2));
            }
            seen
        }
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            self.running.store(false, Ordering::Relaxed);
            if let Some(puller) = self.puller.take() {
                let _ = puller.join();
            }
        }
    }

    fn pull_samples(mut output: SourcesQueueOutput<f32>, running: Arc<AtomicBool>) -> JoinHandle<()> {
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                for _ in 0..PULL_CHUNK {
                    if output.next().is_none() {
                        return;
                    }
                }
                thread::sleep(Duration::from_millis(1));
            }
        })
    }

    #[test]
    fn test_open_reports_metadata_then_play() {
        let mut harness = Harness::new(1.0, true, false);
        assert_eq!(harness.drain(), vec![DeviceEvent::MetadataReady, DeviceEvent::Played]);
        assert!(!harness.device.sink.is_paused());

        let mut paused = Harness::new(1.0, false, false);
        assert_eq!(paused.drain(), vec![DeviceEvent::MetadataReady]);
        assert!(paused.device.sink.is_paused());
    }

    #[test]
    fn test_seek_reports_target_before_sink_catches_up() {
        let mut harness = Harness::new(60.0, false, false);
        harness.drain();

        harness.device.set_current_time(30).unwrap();
        assert!(harness.device.current_time() >= 30.0);
        assert_eq!(harness.drain(), vec![DeviceEvent::TimeUpdate]);

        // Paused, so the clock settles on the target
        thread::sleep(Duration::from_millis(50));
        harness.device.tick();
        let settled = harness.device.current_time();
        assert!((30.0..31.0).contains(&settled), "settled at {}", settled);
    }

    #[test]
    fn test_back_to_back_seeks_both_land() {
        let mut harness = Harness::new(60.0, false, false);
        harness.drain();

        harness.device.set_current_time(10).unwrap();
        let first = harness.device.current_time().floor() as u64;
        harness.device.set_current_time(first + 10).unwrap();
        assert!(harness.device.current_time() >= 20.0);
    }

    #[test]
    fn test_end_of_media_reports_time_pause_then_end() {
        let mut harness = Harness::new(0.5, true, false);
        harness.drain();

        let events = harness.tick_until(DeviceEvent::Ended);
        assert_eq!(
            events[events.len() - 3..],
            [DeviceEvent::TimeUpdate, DeviceEvent::Paused, DeviceEvent::Ended]
        );
        assert!(harness.device.ended);
        assert!(harness.device.sink.is_paused());

        // Nothing more once ended
        assert!(harness.tick_for(Duration::from_millis(20)).is_empty());
    }

    #[test]
    fn test_looping_reloads_instead_of_ending() {
        let mut harness = Harness::new(0.2, true, true);
        harness.drain();

        // Several times the file length at the pull rate
        let events = harness.tick_for(Duration::from_millis(400));
        assert!(!events.contains(&DeviceEvent::Ended));
        assert!(!events.contains(&DeviceEvent::Paused));
        assert!(!harness.device.ended);

        harness.device.set_looping(false);
        harness.tick_until(DeviceEvent::Ended);
    }

    #[test]
    fn test_play_after_end_reloads_the_file() {
        let mut harness = Harness::new(0.3, true, false);
        harness.drain();
        harness.tick_until(DeviceEvent::Ended);

        harness.device.play().unwrap();
        assert_eq!(harness.drain(), vec![DeviceEvent::Played]);
        assert!(!harness.device.ended);
        assert!(!harness.device.sink.is_paused());

        // And it plays through to the end again
        harness.tick_until(DeviceEvent::Ended);
    }

    #[test]
    fn test_missing_file_fails_to_open() {
        let (sink, _output) = Sink::new_idle();
        let (events, _receiver) = DeviceEvents::channel();
        let request = MountRequest {
            source: "/definitely/not/here.wav",
            duration: 10,
            autoplay: true,
            looping: false,
        };

        let result = RodioDevice::open(sink, PathBuf::from(request.source), events, &request);
        assert!(matches!(result, Err(DeviceError::Open { .. })));
    }
}
