//! High-level window surface handle
//!
//! Applications hold a [`WindowSurface`] and never name the backend.
//! Teardown is RAII: dropping the surface releases the rendering
//! context, then the window, each guarded against partial construction
//! by the backend itself.

use super::backend::WindowBackend;
use super::{SurfaceConfig, SurfaceEventHandler, WindowResult};
use crate::render::opengl::window::GlfwSurface;
use std::os::raw::c_void;

/// A native window with an active OpenGL context.
///
/// Rendering-context operations (entry-point resolution, GL calls,
/// buffer swaps) are only valid between `open` and drop, on the thread
/// that opened the surface.
pub struct WindowSurface {
    backend: Box<dyn WindowBackend>,
}

impl WindowSurface {
    /// Open a window and make its context current.
    ///
    /// Every step of the negotiation is a hard failure point: the
    /// first one to fail is logged and aborts the call. No retry, no
    /// fallback pixel format.
    pub fn open(config: &SurfaceConfig) -> WindowResult<Self> {
        let backend = GlfwSurface::open(config)?;
        Ok(Self {
            backend: Box::new(backend),
        })
    }

    /// True once a close has been requested.
    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    /// Programmatically request closure.
    pub fn request_close(&mut self) {
        self.backend.set_should_close(true);
    }

    /// Drain pending events, dispatching close/resize to `handler`.
    ///
    /// Non-blocking; returns once the queue is empty. Handlers run
    /// synchronously on this thread.
    pub fn poll_events(&mut self, handler: &mut dyn SurfaceEventHandler) {
        self.backend.poll_events(handler);
    }

    /// Present the back buffer.
    pub fn swap_buffers(&mut self) {
        self.backend.swap_buffers();
    }

    /// Resolve a named GL entry point against this surface's context.
    pub fn proc_address(&mut self, name: &str) -> *const c_void {
        self.backend.proc_address(name)
    }

    /// Current framebuffer size in pixels.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.backend.framebuffer_size()
    }
}
