//! Interactive slice viewing.
//!
//! A viewing session is an explicit state machine ([`ViewerState`]) owned
//! by a [`ViewerController`], which performs the I/O, drives the playback
//! timer and paints the current slice onto a [`Surface`](crate::Surface).
//!
//! ```no_run
//! use niiview::viewer::{Event, ViewerController};
//! use niiview::{Plane, Raster};
//!
//! # async fn demo() {
//! let mut viewer = ViewerController::new(Raster::default());
//! viewer.select_file("brain.nii").await;
//! viewer.dispatch(Event::SetPlane(Plane::Coronal));
//! viewer.dispatch(Event::Play);
//! viewer.tick().await;
//! println!("{}", viewer.snapshot().position_label());
//! # }
//! ```

mod controller;
mod options;
mod state;
mod timer;

pub use self::controller::ViewerController;
pub use self::options::ViewerOptions;
pub use self::state::{Effect, Event, Notice, Phase, TimerId, ViewerSnapshot, ViewerState};
pub use self::timer::PlaybackTimer;
