/// Rolling frames-per-second estimate, refreshed once per interval
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: f32,
    frame_count: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    /// Counter that refreshes every `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            frame_count: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Record one frame; returns the new estimate when it refreshes
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.elapsed += delta;

        if self.elapsed >= self.interval && self.elapsed > 0.0 {
            self.fps = self.frame_count as f32 / self.elapsed;
            self.frame_count = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
