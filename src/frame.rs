use std::time::Instant;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the first frame
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Numbers frames and measures the time between them
#[derive(Debug, Clone)]
pub struct FrameIterator {
    frame_number: u64,
    start_time: Option<Instant>,
    last_frame_time: Option<Instant>,
}

impl FrameIterator {
    pub fn new() -> Self {
        Self {
            frame_number: 0,
            start_time: None,
            last_frame_time: None,
        }
    }

    /// Frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Stamp the next frame at `now`. The first frame has zero delta.
    pub fn frame_at(&mut self, now: Instant) -> FrameInfo {
        let start = *self.start_time.get_or_insert(now);
        let last = self.last_frame_time.unwrap_or(now);

        let info = FrameInfo::new(
            self.frame_number,
            now.saturating_duration_since(start).as_secs_f32(),
            now.saturating_duration_since(last).as_secs_f32(),
        );

        self.frame_number += 1;
        self.last_frame_time = Some(now);
        info
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}
