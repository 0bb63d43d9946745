pub mod clock;
pub mod controller;
pub mod input_adapter;
pub mod rotation;
pub mod scene_mode;
pub mod snapshot;
pub mod timer;

pub use clock::*;
pub use controller::*;
pub use input_adapter::*;
pub use rotation::*;
pub use scene_mode::*;
pub use snapshot::{FrameState, HandState, SnapshotReader, SnapshotWriter};
pub use timer::*;
