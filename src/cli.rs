// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "gesture-tree")]
#[command(about = "Hand-gesture driven particle tree, replayed from landmark scripts", long_about = None)]
pub struct Cli {
    /// Landmark script to replay (JSON); the built-in demo runs when omitted
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// JSON config file; falls back to $GESTURE_TREE_CONFIG, then defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory to store captured photos in; captures are only counted without it
    #[arg(long)]
    pub uploads: Option<PathBuf>,

    /// URL prefix for stored photos
    #[arg(long, default_value = "/uploads/christmas")]
    pub url_prefix: String,

    /// Photo URL already on the tree (repeatable)
    #[arg(long = "photo")]
    pub photos: Vec<String>,

    /// Frame spacing of the built-in demo in milliseconds
    #[arg(long, default_value_t = 33)]
    pub frame_ms: u64,

    /// Replay in real time with tracking and rendering on separate threads
    #[arg(long)]
    pub live: bool,

    /// Render rate for --live
    #[arg(long, default_value_t = 60.0)]
    pub render_hz: f32,

    /// Print one JSON report per frame; not available with --live
    #[arg(long, conflicts_with = "live")]
    pub json: bool,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
