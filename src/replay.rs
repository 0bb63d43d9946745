//! Scripted sessions: recorded (or synthetic) landmark frames driven through
//! the whole pipeline without a camera or a window.

use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::capture::{CaptureEvent, CaptureQueue, CapturedImage, PhotoUploader, PreviewId};
use crate::config::Config;
use crate::core::{
    snapshot, spawn_tracker, Clock, DetectorFrame, FrameState, HandController, SceneMode,
    SnapshotReader, TrackerFrame,
};
use crate::frame::{FrameInfo, FrameIterator};
use crate::gesture::Gesture;
use crate::landmarks::HandLandmarks;
use crate::scene::{PhotoAlbum, TreeScene};

const PREVIEW_WIDTH: u32 = 160;
const PREVIEW_HEIGHT: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptFrame {
    pub t_ms: u64,
    #[serde(default)]
    pub landmarks: Option<HandLandmarks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub frames: Vec<ScriptFrame>,
}

impl ReplayScript {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {:?}", path))?;
        let script: ReplayScript = serde_json::from_str(&text)
            .with_context(|| format!("Invalid script: {:?}", path))?;
        info!("loaded {} frames from {:?}", script.frames.len(), path);
        Ok(script)
    }

    pub fn duration_ms(&self) -> u64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(a), Some(b)) => b.t_ms.saturating_sub(a.t_ms),
            _ => 0,
        }
    }
}

/// What happened on one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub t_ms: u64,
    pub gesture: Gesture,
    pub tracking: bool,
    pub mode: SceneMode,
    pub countdown: Option<u8>,
    /// Preview id of a capture triggered on this frame
    pub capture: Option<PreviewId>,
    pub velocity: f32,
    pub angle: f32,
    pub focused_photo: Option<String>,
    /// Upload status line, once any capture was made
    pub status: Option<String>,
}

/// Captured photos on their way into the album
#[derive(Debug, Default)]
struct PhotoDesk {
    album: PhotoAlbum,
    queue: Option<CaptureQueue>,
    count: usize,
}

impl PhotoDesk {
    /// Snapshot the tree and start its upload
    fn capture(&mut self, tree: &TreeScene) -> Option<PreviewId> {
        self.count += 1;
        let queue = self.queue.as_mut()?;
        let preview = tree.render_preview(PREVIEW_WIDTH, PREVIEW_HEIGHT);
        match CapturedImage::from_preview(&preview) {
            Ok(image) => Some(queue.submit(image)),
            Err(e) => {
                warn!("capture {} dropped: {e:#}", self.count);
                None
            }
        }
    }

    fn poll(&mut self, tree: &mut TreeScene) {
        let events = match self.queue.as_mut() {
            Some(queue) => queue.poll(),
            None => return,
        };
        self.absorb(&events, tree);
    }

    fn finish(&mut self, tree: &mut TreeScene) -> Vec<CaptureEvent> {
        let events = match self.queue.as_mut() {
            Some(queue) => queue.wait_idle(),
            None => Vec::new(),
        };
        self.absorb(&events, tree);
        events
    }

    fn status(&self) -> Option<&str> {
        self.queue.as_ref().and_then(|q| q.status())
    }

    fn absorb(&mut self, events: &[CaptureEvent], tree: &mut TreeScene) {
        let mut changed = false;
        for event in events {
            if let CaptureEvent::Uploaded { url, .. } = event {
                self.album.add(url.clone());
                changed = true;
            }
        }
        if changed {
            debug!("album now holds {} photos", self.album.len());
            tree.sync_photos(self.album.urls());
        }
    }
}

/// Controller, tree scene, capture queue and album wired together
///
/// Frames are processed in lock step: each `step` classifies one tracker
/// frame and then advances the render side by the frame's delta.
#[derive(Debug)]
pub struct Session {
    controller: HandController,
    reader: SnapshotReader<FrameState>,
    tree: TreeScene,
    desk: PhotoDesk,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let (writer, reader) = snapshot::channel(FrameState::default());
        let controller = HandController::new(config.gesture, config.hold, config.scene)
            .with_publisher(writer);
        Self {
            controller,
            reader,
            tree: TreeScene::new(config),
            desk: PhotoDesk::default(),
        }
    }

    /// Upload captures through `uploader`; without one, captures are only counted
    pub fn with_uploader(mut self, uploader: Arc<dyn PhotoUploader>) -> Self {
        self.desk.queue = Some(CaptureQueue::new(uploader));
        self
    }

    pub fn with_album(mut self, album: PhotoAlbum) -> Self {
        self.desk.album = album;
        self.tree.sync_photos(self.desk.album.urls());
        self
    }

    pub fn album(&self) -> &PhotoAlbum {
        &self.desk.album
    }

    pub fn tree(&self) -> &TreeScene {
        &self.tree
    }

    pub fn mode(&self) -> SceneMode {
        self.controller.mode()
    }

    pub fn capture_count(&self) -> usize {
        self.desk.count
    }

    pub fn capture_status(&self) -> Option<&str> {
        self.desk.status()
    }

    /// Feed one tracker frame and advance the render side by `frame.delta`
    pub fn step(&mut self, hand: Option<&HandLandmarks>, frame: FrameInfo) -> FrameReport {
        let outcome = self.controller.process(hand, frame.t_ms);

        // The render side only sees what was published
        let state = *self.reader.latest();
        self.tree.frame(&state, frame.delta);

        let capture = if outcome.capture {
            self.desk.capture(&self.tree)
        } else {
            None
        };
        self.desk.poll(&mut self.tree);

        FrameReport {
            t_ms: frame.t_ms,
            gesture: state.hand.gesture,
            tracking: state.hand.tracking,
            mode: state.mode,
            countdown: state.countdown,
            capture,
            velocity: self.tree.rotation().velocity(),
            angle: self.tree.rotation().angle(),
            focused_photo: self.tree.focused_photo().map(str::to_owned),
            status: self.capture_status().map(str::to_owned),
        }
    }

    /// Run every frame of `script` in order
    pub fn run(&mut self, script: &ReplayScript) -> Vec<FrameReport> {
        let stamps = script.frames.iter().map(|f| f.t_ms);
        FrameIterator::new(stamps)
            .zip(&script.frames)
            .map(|(info, frame)| self.step(frame.landmarks.as_ref(), info))
            .collect()
    }

    /// Wait for outstanding uploads and fold them into the album
    pub fn finish(&mut self) -> Vec<CaptureEvent> {
        self.desk.finish(&mut self.tree)
    }
}

/// Outcome of a real-time run
#[derive(Debug)]
pub struct LiveSummary {
    pub rendered_frames: u64,
    pub final_state: FrameState,
    pub captures: usize,
    pub events: Vec<CaptureEvent>,
    pub album: PhotoAlbum,
}

/// Replay `script` in real time with tracking and rendering on separate threads
///
/// A feeder thread releases frames at their timestamps into a tracker thread;
/// the calling thread renders at `render_hz`, seeing hand state only through
/// the snapshot. Ends once the script is exhausted and all uploads settled.
pub fn run_live(
    config: &Config,
    script: &ReplayScript,
    render_hz: f32,
    uploader: Option<Arc<dyn PhotoUploader>>,
    album: PhotoAlbum,
) -> Result<LiveSummary> {
    let (writer, mut reader) = snapshot::channel(FrameState::default());
    let controller =
        HandController::new(config.gesture, config.hold, config.scene).with_publisher(writer);

    let (frame_tx, frame_rx) = mpsc::channel::<TrackerFrame>();
    let (capture_tx, capture_rx) = mpsc::channel::<u64>();
    let tracker = spawn_tracker(controller, frame_rx, move |t_ms| {
        let _ = capture_tx.send(t_ms);
    });

    let frames = script.frames.clone();
    let feeder = thread::spawn(move || {
        let clock = Clock::new();
        let origin = frames.first().map_or(0, |f| f.t_ms);
        for frame in frames {
            let due = frame.t_ms.saturating_sub(origin);
            let now = clock.elapsed_ms();
            if due > now {
                thread::sleep(Duration::from_millis(due - now));
            }
            let detection = frame
                .landmarks
                .as_ref()
                .map_or_else(DetectorFrame::empty, DetectorFrame::single);
            if frame_tx
                .send(TrackerFrame {
                    t_ms: frame.t_ms,
                    detection,
                })
                .is_err()
            {
                break;
            }
        }
    });

    let mut tree = TreeScene::new(config);
    tree.sync_photos(album.urls());
    let mut desk = PhotoDesk {
        album,
        queue: uploader.map(CaptureQueue::new),
        count: 0,
    };

    let period = Duration::from_secs_f32(1.0 / render_hz.max(1.0));
    let mut clock = Clock::new();
    let mut rendered_frames = 0;
    loop {
        let done = tracker.is_finished();
        let delta = clock.tick();
        let state = *reader.latest();
        tree.frame(&state, delta);
        for t_ms in capture_rx.try_iter() {
            info!("capture requested at {t_ms} ms");
            desk.capture(&tree);
        }
        desk.poll(&mut tree);
        rendered_frames += 1;
        if done {
            break;
        }
        thread::sleep(period);
    }

    feeder
        .join()
        .map_err(|_| anyhow::anyhow!("frame feeder thread panicked"))?;
    let controller = tracker
        .join()
        .map_err(|_| anyhow::anyhow!("tracker thread panicked"))?;
    debug!("tracker stopped in {} mode", controller.mode().as_str());

    let events = desk.finish(&mut tree);
    Ok(LiveSummary {
        rendered_frames,
        final_state: *reader.latest(),
        captures: desk.count,
        events,
        album: desk.album,
    })
}
