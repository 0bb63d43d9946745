use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;

use gesture_tree::capture::{DirectoryUploader, PhotoUploader};
use gesture_tree::cli::Cli;
use gesture_tree::core::SceneMode;
use gesture_tree::replay::{run_live, FrameReport, ReplayScript, Session};
use gesture_tree::scene::PhotoAlbum;
use gesture_tree::{synthetic, Config};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    let script = match &cli.script {
        Some(path) => ReplayScript::load(path)?,
        None => synthetic::demo_script(cli.frame_ms),
    };
    let uploader = cli.uploads.as_ref().map(|dir| {
        info!("storing captures in {:?}", dir);
        Arc::new(DirectoryUploader::new(dir, cli.url_prefix.as_str())) as Arc<dyn PhotoUploader>
    });
    let album = PhotoAlbum::from_urls(cli.photos.clone());

    if cli.live {
        let summary = run_live(&config, &script, cli.render_hz, uploader, album)?;
        if !cli.no_ui {
            println!("Rendered frames: {}", summary.rendered_frames);
            println!("Final mode:      {}", summary.final_state.mode.as_str());
            println!("Captures:        {}", summary.captures);
            println!("Photos on tree:  {}", summary.album.len());
        }
        return Ok(());
    }

    let mut session = Session::new(&config).with_album(album);
    if let Some(uploader) = uploader {
        session = session.with_uploader(uploader);
    }

    let reports = session.run(&script);
    if cli.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
    }
    let events = session.finish();

    if !cli.no_ui {
        print_summary(&reports);
        println!("Captures:        {}", session.capture_count());
        println!("Uploads settled: {}", events.len());
        println!("Photos on tree:  {}", session.album().len());
        if let Some(status) = session.capture_status() {
            println!("Upload status:   {}", status);
        }
    }

    Ok(())
}

fn print_summary(reports: &[FrameReport]) {
    println!("{:>8}  {:<10}  {:<10}", "t (ms)", "mode", "gesture");
    let mut last: Option<SceneMode> = None;
    for r in reports {
        if last != Some(r.mode) {
            println!("{:>8}  {:<10}  {:<10}", r.t_ms, r.mode.as_str(), r.gesture.as_str());
            last = Some(r.mode);
        }
    }
    if let Some(r) = reports.last() {
        println!(
            "Frames: {}  final velocity {:.3} rad/s  angle {:.2} rad",
            reports.len(),
            r.velocity,
            r.angle
        );
    }
}
