use std::sync::Arc;
use winit::window::Window as WinitWindow;

use crate::context::SceneContext;
use crate::renderer::{HudStats, SceneRenderer};

/// Wrapper around winit Window with imperative draw API
pub struct Window {
    inner: Arc<WinitWindow>,
}

impl Window {
    pub fn new(window: Arc<WinitWindow>) -> Self {
        Self { inner: window }
    }

    pub fn inner(&self) -> &Arc<WinitWindow> {
        &self.inner
    }

    /// Draw the scene as seen by the context's camera
    pub fn draw(
        &self,
        renderer: &mut SceneRenderer,
        ctx: &SceneContext,
        stats: &HudStats,
    ) -> Result<(), wgpu::SurfaceError> {
        renderer.render(ctx, &self.inner, stats)
    }

    pub fn request_redraw(&self) {
        self.inner.request_redraw();
    }

    pub fn inner_size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.inner.inner_size()
    }
}
