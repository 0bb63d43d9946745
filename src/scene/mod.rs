pub mod album;
pub mod particles;
pub mod photos;
pub mod tree;

pub use album::PhotoAlbum;
pub use particles::{ParticleConfig, ParticleField};
pub use photos::{PhotoCloud, CAMERA_POSITION, FOCUS_POINT};
pub use tree::{Preview, TreeScene};
