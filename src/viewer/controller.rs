//! The controller owning one viewing session.
use std::collections::VecDeque;
use std::path::Path;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use super::options::ViewerOptions;
use super::state::{Effect, Event, TimerId, ViewerSnapshot, ViewerState};
use super::timer::PlaybackTimer;
use crate::error::{NiftiError, Result};
use crate::render::{render, Surface};

/// Owns the state of a viewing session together with the surface it is
/// drawn on and the playback timer, and carries out the effects of every
/// transition.
///
/// Timers are spawned on the ambient tokio runtime. Dropping the
/// controller stops any running timer.
#[derive(Debug)]
pub struct ViewerController<S> {
    state: ViewerState,
    surface: S,
    timer: Option<PlaybackTimer>,
    pending_read: Option<(u64, String)>,
    tick_tx: mpsc::UnboundedSender<TimerId>,
    tick_rx: mpsc::UnboundedReceiver<TimerId>,
    snapshots: watch::Sender<ViewerSnapshot>,
    renders: usize,
}

impl<S> ViewerController<S>
where
    S: Surface,
{
    /// Create a controller with the default options.
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, ViewerOptions::default())
    }

    /// Create a controller with the given options.
    pub fn with_options(surface: S, options: ViewerOptions) -> Self {
        let state = ViewerState::new(options);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(state.snapshot());
        ViewerController {
            state,
            surface,
            timer: None,
            pending_read: None,
            tick_tx,
            tick_rx,
            snapshots,
            renders: 0,
        }
    }

    /// Apply an event and everything it leads to, then publish a new
    /// snapshot.
    pub fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::new();
        queue.push_back(event);
        while let Some(event) = queue.pop_front() {
            for effect in self.state.apply(event) {
                if let Some(follow_up) = self.perform(effect) {
                    queue.push_back(follow_up);
                }
            }
        }
        let _ = self.snapshots.send_replace(self.state.snapshot());
    }

    fn perform(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::ReadFile { generation, name } => {
                self.pending_read = Some((generation, name));
                None
            }
            Effect::StartTimer { timer, interval } => {
                debug!(timer = timer.get(), ?interval, "starting playback timer");
                self.timer = Some(PlaybackTimer::start(timer, interval, self.tick_tx.clone()));
                None
            }
            Effect::CancelTimer(timer) => {
                if self.timer.as_ref().map(PlaybackTimer::id) == Some(timer) {
                    debug!(timer = timer.get(), "stopping playback timer");
                    self.timer = None;
                }
                None
            }
            Effect::Render => match self.redraw() {
                Ok(()) => None,
                Err(NiftiError::RenderFailure(reason)) => Some(Event::RenderFailed(reason)),
                Err(err) => Some(Event::RenderFailed(err.to_string())),
            },
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let (volume, request) = match (self.state.volume(), self.state.slice_request()) {
            (Some(volume), Some(request)) => (volume, request),
            _ => return Ok(()),
        };
        let slice = volume.slice(request);
        render(&slice, &mut self.surface)?;
        self.renders += 1;
        trace!(
            plane = %request.plane,
            index = slice.index(),
            width = slice.width(),
            height = slice.height(),
            "slice rendered"
        );
        Ok(())
    }

    /// Select a file and report the load generation under which its
    /// contents are expected, or `None` if it was rejected up front.
    /// The caller reads the file and hands the result to
    /// [`finish_load`](#method.finish_load).
    pub fn begin_load<N: Into<String>>(&mut self, name: N) -> Option<u64> {
        self.dispatch(Event::FileSelected { name: name.into() });
        self.pending_read.take().map(|(generation, _)| generation)
    }

    /// Deliver the result of a read started with
    /// [`begin_load`](#method.begin_load). Results of superseded loads
    /// are discarded.
    pub fn finish_load(&mut self, generation: u64, result: Result<Vec<u8>>) {
        self.dispatch(Event::FileLoaded { generation, result });
    }

    /// Select a file on disk and load it.
    pub async fn select_file<P: AsRef<Path>>(&mut self, path: P) -> Option<u64> {
        let name = path.as_ref().to_string_lossy().into_owned();
        self.dispatch(Event::FileSelected { name });
        self.read_pending().await
    }

    async fn read_pending(&mut self) -> Option<u64> {
        let (generation, name) = self.pending_read.take()?;
        debug!(generation, file = %name, "reading file");
        let result = tokio::fs::read(&name).await.map_err(NiftiError::from);
        self.finish_load(generation, result);
        Some(generation)
    }

    /// Wait for the next playback tick and apply it. Does not return
    /// while no timer is running.
    pub async fn tick(&mut self) -> TimerId {
        loop {
            if let Some(timer) = self.tick_rx.recv().await {
                self.dispatch(Event::Tick(timer));
                return timer;
            }
        }
    }

    /// Apply every tick that is already queued, returning how many there
    /// were.
    pub fn drain_ticks(&mut self) -> usize {
        let mut count = 0;
        while let Ok(timer) = self.tick_rx.try_recv() {
            self.dispatch(Event::Tick(timer));
            count += 1;
        }
        count
    }

    /// Drive the session from a channel of user events, interleaved with
    /// playback ticks, until the channel closes or `Event::Unmount`
    /// arrives. Selected files are read as they come.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(Event::Unmount) | None => break,
                    Some(event) => {
                        self.dispatch(event);
                        let _ = self.read_pending().await;
                    }
                },
                Some(timer) = self.tick_rx.recv() => self.dispatch(Event::Tick(timer)),
            }
        }
        self.unmount();
    }

    /// Tear the session down: the playback timer is stopped and any read
    /// still in flight will be ignored.
    pub fn unmount(&mut self) {
        self.dispatch(Event::Unmount);
        self.timer = None;
        self.pending_read = None;
    }

    /// Watch the snapshots published after every transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewerSnapshot> {
        self.snapshots.subscribe()
    }

    /// The current state.
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// A copy of what the user interface displays.
    pub fn snapshot(&self) -> ViewerSnapshot {
        self.state.snapshot()
    }

    /// The surface slices are drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether a playback timer is running.
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of successful renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}
