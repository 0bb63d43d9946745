use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::gesture::{observe, Gesture, GestureThresholds, HandObservation};
use crate::landmarks::HandLandmarks;

use super::input_adapter::TrackerFrame;
use super::scene_mode::{ModeChange, SceneConfig, SceneMachine, SceneMode};
use super::snapshot::{FrameState, HandState, SnapshotWriter};
use super::timer::{HoldConfig, HoldTimer};

/// Result of processing one tracker frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub hand: HandState,
    pub mode: SceneMode,
    pub change: Option<ModeChange>,
    pub countdown: Option<u8>,
    /// The capture hold completed on this frame
    pub capture: bool,
}

impl FrameOutcome {
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            hand: self.hand,
            mode: self.mode,
            countdown: self.countdown,
        }
    }
}

/// Landmarks in, scene mode and capture triggers out
///
/// Classification, the focus debounce and the capture hold all run here;
/// the render side only ever sees the published `FrameState`.
#[derive(Debug)]
pub struct HandController {
    thresholds: GestureThresholds,
    hold_config: HoldConfig,
    machine: SceneMachine,
    hold: HoldTimer,
    last_gesture: Gesture,
    publisher: Option<SnapshotWriter<FrameState>>,
}

impl HandController {
    pub fn new(thresholds: GestureThresholds, hold: HoldConfig, scene: SceneConfig) -> Self {
        Self {
            thresholds,
            hold_config: hold,
            machine: SceneMachine::new(scene),
            hold: HoldTimer::Idle,
            last_gesture: Gesture::None,
            publisher: None,
        }
    }

    /// Publish every processed frame to `writer`
    pub fn with_publisher(mut self, writer: SnapshotWriter<FrameState>) -> Self {
        self.publisher = Some(writer);
        self
    }

    pub fn mode(&self) -> SceneMode {
        self.machine.mode()
    }

    pub fn previous_mode(&self) -> SceneMode {
        self.machine.previous()
    }

    /// Process the newest hand (or its absence) at `now_ms`
    pub fn process(&mut self, hand: Option<&HandLandmarks>, now_ms: u64) -> FrameOutcome {
        let observation = observe(hand, &self.thresholds);

        let change = match observation {
            HandObservation::Tracked { gesture, .. } => self.machine.on_gesture(gesture, now_ms),
            HandObservation::Lost | HandObservation::TooFar => {
                self.machine.on_tracking_lost(now_ms)
            }
        };

        let gesture = observation.gesture();
        if gesture != self.last_gesture {
            debug!("gesture {} -> {}", self.last_gesture.as_str(), gesture.as_str());
            self.last_gesture = gesture;
        }

        let signal = self
            .hold
            .advance(gesture == Gesture::VSign, now_ms, &self.hold_config);
        if signal.capture {
            info!("capture hold complete at {now_ms} ms");
        }

        let outcome = FrameOutcome {
            hand: HandState::from(observation),
            mode: self.machine.mode(),
            change,
            countdown: signal.countdown,
            capture: signal.capture,
        };

        if let Some(writer) = &self.publisher {
            if !writer.publish(outcome.frame_state()) {
                debug!("snapshot reader gone; no longer publishing");
                self.publisher = None;
            }
        }

        outcome
    }
}

impl Default for HandController {
    fn default() -> Self {
        Self::new(
            GestureThresholds::default(),
            HoldConfig::default(),
            SceneConfig::default(),
        )
    }
}

/// Run `controller` on its own thread, fed by detector frames
///
/// Capture triggers are forwarded through `on_capture` with the frame time.
/// The thread exits when the frame sender is dropped.
pub fn spawn_tracker<F>(
    mut controller: HandController,
    frames: Receiver<TrackerFrame>,
    mut on_capture: F,
) -> JoinHandle<HandController>
where
    F: FnMut(u64) + Send + 'static,
{
    thread::spawn(move || {
        for frame in frames {
            let hand = frame.detection.primary_hand();
            let outcome = controller.process(hand.as_ref(), frame.t_ms);
            if outcome.capture {
                on_capture(frame.t_ms);
            }
        }
        debug!("tracker input closed");
        controller
    })
}
