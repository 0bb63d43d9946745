/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Capture time of the frame in milliseconds
    pub t_ms: u64,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, t_ms: u64, delta: f32) -> Self {
        Self {
            number,
            t_ms,
            delta,
        }
    }
}

/// Turns a stream of frame timestamps into `FrameInfo`s
///
/// The first frame has zero delta. Timestamps that go backwards also yield
/// zero delta instead of a negative step.
pub struct FrameIterator<I> {
    stamps: I,
    frame_number: u64,
    last_t_ms: Option<u64>,
}

impl<I: Iterator<Item = u64>> FrameIterator<I> {
    pub fn new(stamps: I) -> Self {
        Self {
            stamps,
            frame_number: 0,
            last_t_ms: None,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl<I: Iterator<Item = u64>> Iterator for FrameIterator<I> {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let t_ms = self.stamps.next()?;
        let delta = self
            .last_t_ms
            .map_or(0.0, |last| t_ms.saturating_sub(last) as f32 / 1000.0);

        let info = FrameInfo::new(self.frame_number, t_ms, delta);

        self.frame_number += 1;
        self.last_t_ms = Some(t_ms);

        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_follow_timestamps() {
        let frames: Vec<_> = FrameIterator::new([0u64, 33, 66, 50].into_iter()).collect();
        assert_eq!(frames[0], FrameInfo::new(0, 0, 0.0));
        assert!((frames[1].delta - 0.033).abs() < 1e-6);
        assert_eq!(frames[2].number, 2);
        assert_eq!(frames[3].delta, 0.0);
    }
}
