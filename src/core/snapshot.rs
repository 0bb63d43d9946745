//! Last-write-wins hand-off between the tracking side and the render loop.
//!
//! One writer publishes whenever a frame has been classified; one reader
//! polls once per render frame and only ever sees the newest value.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use glam::Vec2;
use serde::Serialize;

use crate::gesture::{Gesture, HandObservation};

use super::scene_mode::SceneMode;

/// Current hand as seen by the render side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HandState {
    pub tracking: bool,
    pub gesture: Gesture,
    /// Normalized [-1, 1] position, y up
    pub position: Vec2,
    /// Rotation velocity requested by the hand
    pub rotation: f32,
}

impl From<HandObservation> for HandState {
    fn from(obs: HandObservation) -> Self {
        match obs {
            HandObservation::Tracked {
                gesture,
                position,
                rotation,
            } => Self {
                tracking: true,
                gesture,
                position,
                rotation,
            },
            HandObservation::Lost | HandObservation::TooFar => Self::default(),
        }
    }
}

/// Everything the renderer polls each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameState {
    pub hand: HandState,
    pub mode: SceneMode,
    /// Capture countdown digit, if one should be shown
    pub countdown: Option<u8>,
}

type Slot<T> = Mutex<Option<T>>;

fn lock<T>(slot: &Slot<T>) -> MutexGuard<'_, Option<T>> {
    // A plain value slot stays usable after a panicking writer
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producing half of a snapshot channel
#[derive(Debug)]
pub struct SnapshotWriter<T> {
    slot: Weak<Slot<T>>,
}

impl<T> SnapshotWriter<T> {
    /// Publish a new value, replacing any the reader has not taken yet.
    /// Returns false once the reader is gone.
    pub fn publish(&self, value: T) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                *lock(&slot) = Some(value);
                true
            }
            None => false,
        }
    }
}

impl<T> Clone for SnapshotWriter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Weak::clone(&self.slot),
        }
    }
}

/// Consuming half; holds the newest value seen so far
#[derive(Debug)]
pub struct SnapshotReader<T> {
    slot: Arc<Slot<T>>,
    current: T,
}

impl<T> SnapshotReader<T> {
    /// Take the value published since the last call, if any, and keep it
    pub fn latest(&mut self) -> &T {
        if let Some(newest) = lock(&self.slot).take() {
            self.current = newest;
        }
        &self.current
    }

    /// Value returned by the previous `latest` call, without polling
    pub fn current(&self) -> &T {
        &self.current
    }
}

/// Create a snapshot channel starting at `initial`
pub fn channel<T>(initial: T) -> (SnapshotWriter<T>, SnapshotReader<T>) {
    let slot = Arc::new(Mutex::new(None));
    (
        SnapshotWriter {
            slot: Arc::downgrade(&slot),
        },
        SnapshotReader {
            slot,
            current: initial,
        },
    )
}
