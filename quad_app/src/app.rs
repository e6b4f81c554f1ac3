//! Application context: the run flag and window event handling.

use glboot::SurfaceEventHandler;

/// Loop state owned by the application.
///
/// The flag has a single writer — the close handler — and is read once
/// per loop iteration, so a close request costs at most one more frame.
pub struct QuadApp {
    running: bool,
}

impl QuadApp {
    pub fn new() -> Self {
        Self { running: true }
    }

    /// False once a close request has been observed.
    pub fn running(&self) -> bool {
        self.running
    }
}

impl SurfaceEventHandler for QuadApp {
    fn close_requested(&mut self) {
        log::info!("close requested, exiting after this frame");
        self.running = false;
    }

    fn resized(&mut self, width: i32, height: i32) {
        log::info!("[ResizeEvent] width: {width} height: {height}");
        unsafe { gl::Viewport(0, 0, width, height) };
    }
}
