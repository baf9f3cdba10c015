//! The viewer state machine.
//!
//! `ViewerState` owns everything a viewing session knows and changes only
//! through [`ViewerState::apply`], which never performs I/O. Whatever has
//! to happen outside of the state (reading a file, arming or disarming
//! the playback timer, repainting) is returned as a list of [`Effect`]s
//! for the owner to carry out.

use std::time::Duration;
use tracing::{debug, info, trace, warn};

use super::options::ViewerOptions;
use crate::error::{NiftiError, Result};
use crate::header::VolumeHeader;
use crate::slice::{clamp_index, Plane, SliceRequest};
use crate::util::{has_gz_magic, is_gz_file};
use crate::volume::LoadedVolume;

/// Lifecycle phase of a viewing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing was selected yet.
    Empty,
    /// A file read is in flight.
    Loading,
    /// A volume is loaded and shown.
    Ready,
    /// A volume is loaded and the slices are being cycled.
    Playing,
    /// The last load failed, or the last render did.
    Error,
}

/// Identifies one arming of the playback timer. Ticks carrying an
/// identifier other than the current one are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw identifier.
    pub fn new(id: u64) -> Self {
        TimerId(id)
    }

    /// The raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something failed; the action that caused it had no effect.
    Error(String),
    /// Something odd was recovered from; what is shown may be wrong.
    Warning(String),
}

impl Notice {
    /// The message text.
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(m) | Notice::Warning(m) => m,
        }
    }

    /// Whether this is a blocking error rather than a warning.
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Something that happened to the viewer.
#[derive(Debug)]
pub enum Event {
    /// The user picked a file.
    FileSelected {
        /// File name or path, used for the compression check and display.
        name: String,
    },
    /// A file read requested by `Effect::ReadFile` completed.
    FileLoaded {
        /// The load generation the read was issued for.
        generation: u64,
        /// The file contents, or the I/O error.
        result: Result<Vec<u8>>,
    },
    /// A plane selector button was pressed.
    SetPlane(Plane),
    /// The slice scrubber moved. Out of range positions are clamped.
    SetSlice(i64),
    /// Step one slice forward, stopping at the last one.
    StepForward,
    /// Step one slice back, stopping at the first one.
    StepBack,
    /// Start playback.
    Play,
    /// Stop playback.
    Pause,
    /// Play if paused, pause if playing.
    TogglePlay,
    /// The playback speed control moved, in milliseconds per slice.
    SetSpeed(u64),
    /// The playback timer fired.
    Tick(TimerId),
    /// Painting the current slice failed.
    RenderFailed(String),
    /// The viewer is going away.
    Unmount,
}

impl Event {
    /// A short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::FileSelected { .. } => "file-selected",
            Event::FileLoaded { .. } => "file-loaded",
            Event::SetPlane(_) => "set-plane",
            Event::SetSlice(_) => "set-slice",
            Event::StepForward => "step-forward",
            Event::StepBack => "step-back",
            Event::Play => "play",
            Event::Pause => "pause",
            Event::TogglePlay => "toggle-play",
            Event::SetSpeed(_) => "set-speed",
            Event::Tick(_) => "tick",
            Event::RenderFailed(_) => "render-failed",
            Event::Unmount => "unmount",
        }
    }
}

/// Work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the named file and report back with `Event::FileLoaded`.
    ReadFile {
        /// Generation to report the result under.
        generation: u64,
        /// The file to read.
        name: String,
    },
    /// Arm a recurring timer emitting `Event::Tick(timer)`.
    StartTimer {
        /// Identifier the ticks must carry.
        timer: TimerId,
        /// Time between two ticks.
        interval: Duration,
    },
    /// Disarm the given timer.
    CancelTimer(TimerId),
    /// Repaint the current slice.
    Render,
}

/// A read-only copy of what the user interface displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSnapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Selected plane.
    pub plane: Plane,
    /// Index of the shown slice.
    pub current_slice: usize,
    /// Number of slices in the selected plane, 0 without a volume.
    pub total_slices: usize,
    /// Playback interval in milliseconds.
    pub playback_speed_ms: u64,
    /// Name of the selected file.
    pub file_name: Option<String>,
    /// Status message, if any.
    pub notice: Option<Notice>,
}

impl ViewerSnapshot {
    /// One-based slice position, as in `"21 / 40"`.
    pub fn position_label(&self) -> String {
        if self.total_slices == 0 {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.current_slice + 1, self.total_slices)
        }
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}

/// The state of one viewing session.
#[derive(Debug)]
pub struct ViewerState {
    options: ViewerOptions,
    phase: Phase,
    plane: Plane,
    current_slice: usize,
    playback_speed_ms: u64,
    file_name: Option<String>,
    volume: Option<LoadedVolume>,
    generation: u64,
    timer: Option<TimerId>,
    timers_issued: u64,
    notice: Option<Notice>,
}

impl Default for ViewerState {
    fn default() -> Self {
        ViewerState::new(ViewerOptions::default())
    }
}

impl ViewerState {
    /// Create an empty session.
    pub fn new(options: ViewerOptions) -> Self {
        ViewerState {
            phase: Phase::Empty,
            plane: options.plane(),
            current_slice: 0,
            playback_speed_ms: options.playback_speed_ms(),
            file_name: None,
            volume: None,
            generation: 0,
            timer: None,
            timers_issued: 0,
            notice: None,
            options,
        }
    }

    /// Apply one event, returning the effects it calls for in the order
    /// they should be carried out.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        trace!(phase = ?self.phase, event = event.name(), "viewer event");
        let before = self.phase;
        let effects = match event {
            Event::FileSelected { name } => self.select_file(name),
            Event::FileLoaded { generation, result } => self.finish_load(generation, result),
            Event::SetPlane(plane) => self.set_plane(plane),
            Event::SetSlice(index) => self.seek(index),
            Event::StepForward => self.seek(self.current_slice as i64 + 1),
            Event::StepBack => self.seek(self.current_slice as i64 - 1),
            Event::Play => self.play(),
            Event::Pause => self.pause(),
            Event::TogglePlay => {
                if self.phase == Phase::Playing {
                    self.pause()
                } else {
                    self.play()
                }
            }
            Event::SetSpeed(ms) => self.set_speed(ms),
            Event::Tick(timer) => self.tick(timer),
            Event::RenderFailed(reason) => self.render_failed(reason),
            Event::Unmount => self.unmount(),
        };
        if before != self.phase {
            debug!(from = ?before, to = ?self.phase, "viewer phase changed");
        }
        effects
    }

    fn select_file(&mut self, name: String) -> Vec<Effect> {
        if is_gz_file(&name) {
            let err = NiftiError::UnsupportedFormat(name);
            warn!(%err, "rejected file before reading");
            self.notice = Some(Notice::Error(err.to_string()));
            return Vec::new();
        }

        let mut effects: Vec<Effect> = self.stop_timer().into_iter().collect();
        self.generation += 1;
        self.phase = Phase::Loading;
        self.volume = None;
        self.current_slice = 0;
        self.notice = None;
        self.file_name = Some(name.clone());
        effects.push(Effect::ReadFile {
            generation: self.generation,
            name,
        });
        effects
    }

    fn finish_load(&mut self, generation: u64, result: Result<Vec<u8>>) -> Vec<Effect> {
        if generation != self.generation || self.phase != Phase::Loading {
            debug!(
                generation,
                current = self.generation,
                "dropping result of a superseded load"
            );
            return Vec::new();
        }

        match result.and_then(|buffer| self.decode(buffer)) {
            Ok((volume, warning)) => {
                let total = self.plane.extent(volume.header());
                self.current_slice = total / 2;
                info!(
                    file = self.file_name.as_deref().unwrap_or_default(),
                    dim = ?volume.header().dim,
                    datatype = ?volume.header().datatype,
                    "volume loaded"
                );
                self.volume = Some(volume);
                self.phase = Phase::Ready;
                self.notice = warning.map(Notice::Warning);
                vec![Effect::Render]
            }
            Err(err) => {
                warn!(%err, "failed to load volume");
                self.phase = Phase::Error;
                self.notice = Some(Notice::Error(err.to_string()));
                Vec::new()
            }
        }
    }

    /// Turn a file buffer into a volume, plus a warning if the layout had
    /// to be guessed or the file looks truncated.
    fn decode(&self, buffer: Vec<u8>) -> Result<(LoadedVolume, Option<String>)> {
        if has_gz_magic(&buffer) {
            return Err(NiftiError::UnsupportedFormat(
                self.file_name.clone().unwrap_or_default(),
            ));
        }
        let header = match VolumeHeader::from_bytes(&buffer) {
            Ok(header) => header,
            Err(NiftiError::InvalidFormat) if self.options.best_guess_recovery() => {
                let header = VolumeHeader::best_guess(buffer.len());
                warn!(dim = ?header.dim, "no header format recognized, guessing the layout");
                let warning = format!(
                    "Unrecognized header, showing a best-guess {}x{}x{} volume",
                    header.nx(),
                    header.ny(),
                    header.nz()
                );
                return Ok((LoadedVolume::new(header, buffer), Some(warning)));
            }
            Err(err) => return Err(err),
        };

        let warning = if header.default_dims {
            Some(format!(
                "Could not read the volume dimensions, showing a default {}x{}x{} volume",
                header.nx(),
                header.ny(),
                header.nz()
            ))
        } else if buffer.len() < header.expected_len() {
            Some(format!(
                "File may be truncated ({} of {} bytes)",
                buffer.len(),
                header.expected_len()
            ))
        } else {
            None
        };
        Ok((LoadedVolume::new(header, buffer), warning))
    }

    fn set_plane(&mut self, plane: Plane) -> Vec<Effect> {
        self.plane = plane;
        self.seek(self.current_slice as i64)
    }

    fn seek(&mut self, index: i64) -> Vec<Effect> {
        if self.volume.is_none() {
            return Vec::new();
        }
        self.current_slice = clamp_index(index, self.total_slices());
        if self.phase == Phase::Error {
            // a loaded volume in error state failed to render; try again
            self.phase = Phase::Ready;
            self.notice = None;
        }
        vec![Effect::Render]
    }

    fn play(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Ready || self.total_slices() == 0 {
            return Vec::new();
        }
        self.phase = Phase::Playing;
        vec![self.arm_timer()]
    }

    fn pause(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        self.phase = Phase::Ready;
        self.stop_timer().into_iter().collect()
    }

    fn set_speed(&mut self, ms: u64) -> Vec<Effect> {
        let ms = self.options.snap_speed(ms);
        if ms == self.playback_speed_ms {
            return Vec::new();
        }
        self.playback_speed_ms = ms;
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let mut effects: Vec<Effect> = self.stop_timer().into_iter().collect();
        effects.push(self.arm_timer());
        effects
    }

    fn tick(&mut self, timer: TimerId) -> Vec<Effect> {
        if self.phase != Phase::Playing || self.timer != Some(timer) {
            trace!(timer = timer.get(), "ignoring stale tick");
            return Vec::new();
        }
        let total = self.total_slices();
        if total == 0 {
            return Vec::new();
        }
        self.current_slice = (self.current_slice + 1) % total;
        vec![Effect::Render]
    }

    fn render_failed(&mut self, reason: String) -> Vec<Effect> {
        let err = NiftiError::RenderFailure(reason);
        warn!(%err, "render failed");
        self.notice = Some(Notice::Error(err.to_string()));
        if self.volume.is_none() {
            return Vec::new();
        }
        self.phase = Phase::Error;
        self.stop_timer().into_iter().collect()
    }

    fn unmount(&mut self) -> Vec<Effect> {
        // invalidate any read still in flight
        self.generation += 1;
        self.phase = match self.phase {
            Phase::Loading => Phase::Empty,
            Phase::Playing => Phase::Ready,
            other => other,
        };
        self.stop_timer().into_iter().collect()
    }

    fn arm_timer(&mut self) -> Effect {
        self.timers_issued += 1;
        let timer = TimerId(self.timers_issued);
        self.timer = Some(timer);
        Effect::StartTimer {
            timer,
            interval: Duration::from_millis(self.playback_speed_ms),
        }
    }

    fn stop_timer(&mut self) -> Option<Effect> {
        self.timer.take().map(Effect::CancelTimer)
    }

    /// The session's options.
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Selected plane.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Index of the shown slice.
    pub fn current_slice(&self) -> usize {
        self.current_slice
    }

    /// Number of slices in the selected plane, 0 without a volume.
    pub fn total_slices(&self) -> usize {
        self.volume
            .as_ref()
            .map(|v| self.plane.extent(v.header()))
            .unwrap_or(0)
    }

    /// Playback interval in milliseconds.
    pub fn playback_speed_ms(&self) -> u64 {
        self.playback_speed_ms
    }

    /// The loaded volume, if any.
    pub fn volume(&self) -> Option<&LoadedVolume> {
        self.volume.as_ref()
    }

    /// The slice currently shown, if a volume is loaded.
    pub fn slice_request(&self) -> Option<SliceRequest> {
        self.volume
            .as_ref()
            .map(|_| SliceRequest::new(self.plane, self.current_slice as i64))
    }

    /// Generation of the most recent load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The armed playback timer, if any.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Current status message.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Name of the selected file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Copy out what the user interface displays.
    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            phase: self.phase,
            plane: self.plane,
            current_slice: self.current_slice,
            total_slices: self.total_slices(),
            playback_speed_ms: self.playback_speed_ms,
            file_name: self.file_name.clone(),
            notice: self.notice.clone(),
        }
    }
}
