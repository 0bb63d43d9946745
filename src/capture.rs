//! Non-blocking photo capture.
//!
//! A captured frame gets a local preview id straight away; the upload runs on
//! a worker thread and is reconciled later by polling, so the frame loop
//! never waits on storage.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;

use crate::scene::Preview;

/// Local handle for a capture whose upload may still be running
pub type PreviewId = u64;

pub const STATUS_UPLOADING: &str = "Uploading...";
pub const STATUS_UPLOADED: &str = "Uploaded";

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    /// File extension without the dot
    pub extension: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>, extension: impl Into<String>) -> Self {
        Self {
            bytes,
            extension: extension.into(),
            captured_at: Utc::now(),
        }
    }

    /// PNG snapshot of a rendered preview
    pub fn from_preview(preview: &Preview) -> Result<Self> {
        Ok(Self::new(preview.to_png()?, "png"))
    }
}

/// Stores an image somewhere and returns the URL it is served from
pub trait PhotoUploader: Send + Sync {
    fn upload(&self, image: &CapturedImage) -> Result<String>;
}

/// Uploader that writes into a local directory
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    root: PathBuf,
    url_prefix: String,
}

impl DirectoryUploader {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// `<unix millis>-<random base36>.<ext>`
    fn file_name(image: &CapturedImage) -> String {
        let suffix = base36(rand::rng().random::<u64>());
        format!(
            "{}-{}.{}",
            image.captured_at.timestamp_millis(),
            suffix,
            image.extension
        )
    }
}

impl PhotoUploader for DirectoryUploader {
    fn upload(&self, image: &CapturedImage) -> Result<String> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create upload directory: {:?}", self.root))?;

        let name = Self::file_name(image);
        let path = self.root.join(&name);
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("Failed to write photo: {:?}", path))?;

        Ok(format!("{}/{}", self.url_prefix.trim_end_matches('/'), name))
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Reconciled result of one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Uploaded { preview: PreviewId, url: String },
    Failed { preview: PreviewId, status: String },
}

impl CaptureEvent {
    pub fn preview(&self) -> PreviewId {
        match self {
            Self::Uploaded { preview, .. } | Self::Failed { preview, .. } => *preview,
        }
    }
}

type UploadResult = (PreviewId, std::result::Result<String, String>);

/// Queue of in-flight uploads; no retries
pub struct CaptureQueue {
    uploader: Arc<dyn PhotoUploader>,
    tx: Sender<UploadResult>,
    rx: Receiver<UploadResult>,
    workers: Vec<(PreviewId, JoinHandle<()>)>,
    next_id: PreviewId,
    status: Option<String>,
}

impl CaptureQueue {
    pub fn new(uploader: Arc<dyn PhotoUploader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            uploader,
            tx,
            rx,
            workers: Vec::new(),
            next_id: 0,
            status: None,
        }
    }

    /// Start uploading `image`; returns at once with its preview id
    pub fn submit(&mut self, image: CapturedImage) -> PreviewId {
        let id = self.next_id;
        self.next_id += 1;

        let uploader = Arc::clone(&self.uploader);
        let tx = self.tx.clone();
        let handle = thread::spawn(move || {
            let result = uploader.upload(&image).map_err(|e| format!("{e:#}"));
            // Receiver only goes away with the queue itself
            let _ = tx.send((id, result));
        });

        self.workers.push((id, handle));
        self.status = Some(STATUS_UPLOADING.to_string());
        info!("capture {id} submitted");
        id
    }

    /// Collect uploads that have finished since the last poll
    pub fn poll(&mut self) -> Vec<CaptureEvent> {
        let finished: Vec<UploadResult> = self.rx.try_iter().collect();
        let mut events: Vec<CaptureEvent> = finished
            .into_iter()
            .map(|(id, result)| self.reconcile(id, result))
            .collect();
        events.extend(self.reap_workers());
        events
    }

    /// Block until every submitted upload has been reconciled
    pub fn wait_idle(&mut self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        for (id, handle) in std::mem::take(&mut self.workers) {
            if handle.join().is_err() {
                events.push(self.reconcile(id, Err("uploader panicked".to_string())));
            }
        }
        events.extend(self.poll());
        events
    }

    /// Uploads still running
    pub fn pending(&self) -> usize {
        self.workers.len()
    }

    /// Latest status line for display
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn reconcile(&mut self, id: PreviewId, result: std::result::Result<String, String>) -> CaptureEvent {
        match result {
            Ok(url) => {
                info!("capture {id} uploaded as {url}");
                self.status = Some(STATUS_UPLOADED.to_string());
                CaptureEvent::Uploaded { preview: id, url }
            }
            Err(e) => {
                warn!("capture {id} upload failed: {e}");
                let status = format!("Upload failed: {e}");
                self.status = Some(status.clone());
                CaptureEvent::Failed { preview: id, status }
            }
        }
    }

    /// Join finished workers; a panicked worker never reports on the channel
    fn reap_workers(&mut self) -> Vec<CaptureEvent> {
        let (done, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.workers)
            .into_iter()
            .partition(|(_, h)| h.is_finished());
        self.workers = running;
        done.into_iter()
            .filter_map(|(id, handle)| handle.join().is_err().then_some(id))
            .map(|id| self.reconcile(id, Err("uploader panicked".to_string())))
            .collect()
    }
}

impl std::fmt::Debug for CaptureQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureQueue")
            .field("pending", &self.workers.len())
            .field("next_id", &self.next_id)
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(std::result::Result<&'static str, &'static str>);

    impl PhotoUploader for Fixed {
        fn upload(&self, _image: &CapturedImage) -> Result<String> {
            match self.0 {
                Ok(url) => Ok(url.to_string()),
                Err(e) => Err(anyhow::anyhow!(e)),
            }
        }
    }

    #[test]
    fn base36_digits() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }

    #[test]
    fn successful_upload_is_reconciled() {
        let mut queue = CaptureQueue::new(Arc::new(Fixed(Ok("/uploads/christmas/a.png"))));
        let id = queue.submit(CapturedImage::new(vec![1, 2, 3], "png"));
        assert_eq!(queue.status(), Some(STATUS_UPLOADING));

        let events = queue.wait_idle();
        assert_eq!(
            events,
            vec![CaptureEvent::Uploaded {
                preview: id,
                url: "/uploads/christmas/a.png".into()
            }]
        );
        assert_eq!(queue.status(), Some(STATUS_UPLOADED));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn failure_becomes_status_string() {
        let mut queue = CaptureQueue::new(Arc::new(Fixed(Err("disk full"))));
        queue.submit(CapturedImage::new(vec![], "png"));
        let events = queue.wait_idle();
        assert!(matches!(&events[..], [CaptureEvent::Failed { status, .. }] if status.contains("disk full")));
        assert!(queue.status().unwrap().starts_with("Upload failed"));
    }

    #[test]
    fn preview_ids_are_sequential() {
        let mut queue = CaptureQueue::new(Arc::new(Fixed(Ok("/x"))));
        let a = queue.submit(CapturedImage::new(vec![], "png"));
        let b = queue.submit(CapturedImage::new(vec![], "png"));
        assert_eq!(b, a + 1);
        assert_eq!(queue.wait_idle().len(), 2);
    }
}
