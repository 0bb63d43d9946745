use log::debug;
use serde::{Deserialize, Serialize};

use crate::gesture::Gesture;

/// High-level arrangement of the tree scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMode {
    /// Particles form the tree; photos hidden
    #[default]
    Assembled,
    /// Particles and photos float freely; the hand steers rotation
    Scattered,
    /// One photo is pulled in front of the camera
    Focused,
}

impl SceneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assembled => "assembled",
            Self::Scattered => "scattered",
            Self::Focused => "focused",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Time since the last pinch before focus may be released
    pub focus_debounce_ms: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            focus_debounce_ms: 500,
        }
    }
}

/// A mode edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeChange {
    pub from: SceneMode,
    pub to: SceneMode,
}

/// Gesture-driven scene mode with debounced focus release
#[derive(Debug, Clone)]
pub struct SceneMachine {
    mode: SceneMode,
    previous: SceneMode,
    last_pinch_ms: Option<u64>,
    config: SceneConfig,
}

impl SceneMachine {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            mode: SceneMode::Assembled,
            previous: SceneMode::Assembled,
            last_pinch_ms: None,
            config,
        }
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Mode before the most recent transition
    pub fn previous(&self) -> SceneMode {
        self.previous
    }

    pub fn last_pinch_ms(&self) -> Option<u64> {
        self.last_pinch_ms
    }

    /// Feed the gesture classified this frame
    pub fn on_gesture(&mut self, gesture: Gesture, now_ms: u64) -> Option<ModeChange> {
        match gesture {
            Gesture::Fist => self.set(SceneMode::Assembled),
            Gesture::Pinch => {
                self.last_pinch_ms = Some(now_ms);
                match self.mode {
                    SceneMode::Scattered | SceneMode::Focused => self.set(SceneMode::Focused),
                    SceneMode::Assembled => None,
                }
            }
            other => {
                let released = self.release_focus(now_ms);
                if other == Gesture::Open && self.mode == SceneMode::Assembled {
                    return self.set(SceneMode::Scattered);
                }
                released
            }
        }
    }

    /// No usable hand this frame
    pub fn on_tracking_lost(&mut self, now_ms: u64) -> Option<ModeChange> {
        self.release_focus(now_ms)
    }

    fn release_focus(&mut self, now_ms: u64) -> Option<ModeChange> {
        if self.mode != SceneMode::Focused {
            return None;
        }
        let since_pinch = self
            .last_pinch_ms
            .map_or(u64::MAX, |t| now_ms.saturating_sub(t));
        if since_pinch > self.config.focus_debounce_ms {
            self.set(SceneMode::Scattered)
        } else {
            None
        }
    }

    fn set(&mut self, to: SceneMode) -> Option<ModeChange> {
        if to == self.mode {
            return None;
        }
        let change = ModeChange { from: self.mode, to };
        debug!("scene mode {} -> {}", change.from.as_str(), change.to.as_str());
        self.previous = self.mode;
        self.mode = to;
        Some(change)
    }
}

impl Default for SceneMachine {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
