//! Per-frame animation driver.
//!
//! The loop is a repeating task with an explicit stop condition: it runs
//! until [`RenderLoop::stop`] is called or an optional frame budget runs out.
//! Drawing itself is done by the caller after a successful [`RenderLoop::tick`].

use glam::Vec3;
use std::time::Instant;

use crate::context::SceneContext;
use crate::frame::{FrameInfo, FrameIterator};
use crate::transform::Transform;

pub const RING_SPIN_X: f32 = 0.01;
pub const RING_SPIN_Y: f32 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    frame_budget: Option<u64>,
    frames: FrameIterator,
}

impl RenderLoop {
    /// A running loop. With `Some(n)` it stops by itself after `n` ticks.
    pub fn new(frame_budget: Option<u64>) -> Self {
        let state = if frame_budget == Some(0) {
            LoopState::Stopped
        } else {
            LoopState::Running
        };
        Self {
            state,
            frame_budget,
            frames: FrameIterator::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frame_count(&self) -> u64 {
        self.frames.frame_count()
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::info!("Render loop stopped after {} frames", self.frame_count());
        }
        self.state = LoopState::Stopped;
    }

    /// Advance the animation by one frame. Returns `None` without touching
    /// the scene once the loop has stopped.
    pub fn tick(&mut self, ctx: &mut SceneContext) -> Option<FrameInfo> {
        self.tick_at(ctx, Instant::now())
    }

    pub fn tick_at(&mut self, ctx: &mut SceneContext, now: Instant) -> Option<FrameInfo> {
        if !self.is_running() {
            return None;
        }

        let frame = self.frames.frame_at(now);

        let ring = ctx.handles.ring;
        if let Some(mesh) = ctx.mesh_mut(ring) {
            spin_ring(&mut mesh.transform);
        }
        ctx.update_controls();

        if self
            .frame_budget
            .is_some_and(|budget| self.frames.frame_count() >= budget)
        {
            self.stop();
        }

        Some(frame)
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Ring animation step. X is advanced twice per frame.
pub fn spin_ring(transform: &mut Transform) {
    transform.rotate_by(Vec3::new(RING_SPIN_X, 0.0, 0.0));
    transform.rotate_by(Vec3::new(0.0, RING_SPIN_Y, 0.0));
    transform.rotate_by(Vec3::new(RING_SPIN_X, 0.0, 0.0));
}
