pub mod capture;
pub mod cli;
pub mod config;
pub mod core;
pub mod frame;
pub mod gesture;
pub mod landmarks;
pub mod replay;
pub mod scene;
pub mod synthetic;
pub mod types;

pub use config::Config;
pub use gesture::{classify, Gesture, GestureThresholds};
pub use landmarks::{HandLandmarks, LandmarkError};
pub use replay::{run_live, FrameReport, ReplayScript, Session};
