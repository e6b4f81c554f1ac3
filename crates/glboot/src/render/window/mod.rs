//! Window management subsystem
//!
//! This module provides the window abstraction layer between the
//! application and the one concrete windowing backend.
//!
//! # Architecture Overview
//!
//! The window subsystem follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼────────┐
//!        │ WindowSurface │ ← Public API (handle.rs)
//!        └──────┬────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ WindowBackend   │ ← Internal trait (backend.rs)
//!      │ trait           │
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ opengl::GlfwSurface   │ ← Concrete backend (../opengl/window.rs)
//!   └───────────────────────┘
//! ```
//!
//! Applications never see glfw types: events are translated into
//! [`SurfaceEvent`]s and dispatched synchronously to a
//! [`SurfaceEventHandler`] from inside the polling path.

pub mod backend;
pub mod handle;

pub use handle::WindowSurface;

use thiserror::Error;

/// Window and context creation errors.
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing system itself failed to initialize.
    #[error("windowing system initialization failed")]
    InitializationFailed,

    /// No window with the requested context could be created.
    #[error("window creation failed")]
    CreationFailed,
}

/// Result alias for surface operations.
pub type WindowResult<T> = Result<T, WindowError>;

/// Window surface configuration.
///
/// Describes both the window and the pixel format / context version
/// negotiated for it.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Window title.
    pub title: String,

    /// Client area width in pixels.
    pub width: u32,

    /// Client area height in pixels.
    pub height: u32,

    /// Requested context version as (major, minor); always core profile.
    pub gl_version: (u32, u32),

    /// Depth buffer bits for the pixel format.
    pub depth_bits: u32,

    /// Stencil buffer bits for the pixel format.
    pub stencil_bits: u32,

    /// Whether the window is user-resizable.
    pub resizable: bool,

    /// VSync setting (swap interval of one when enabled).
    pub vsync: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "OpenGL Window".to_string(),
            width: 1280,
            height: 720,
            gl_version: (4, 6),
            depth_bits: 24,
            stencil_bits: 8,
            resizable: true,
            vsync: true,
        }
    }
}

/// Events surfaced to the application from the native event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The user asked the window to close.
    CloseRequested,

    /// The framebuffer was resized to the given pixel dimensions.
    Resized {
        /// New framebuffer width in pixels.
        width: i32,
        /// New framebuffer height in pixels.
        height: i32,
    },
}

/// Synchronous receiver for [`SurfaceEvent`]s.
///
/// Implementations are invoked from inside the event-polling path, on
/// the polling thread, before `poll_events` returns. A close request
/// must only record the fact (typically by clearing a run flag the
/// loop observes on its next iteration) — it must not tear anything
/// down while the frame is still in flight.
pub trait SurfaceEventHandler {
    /// A close request was drained from the event queue.
    fn close_requested(&mut self) {}

    /// The framebuffer was resized to `width` x `height` pixels.
    fn resized(&mut self, _width: i32, _height: i32) {}
}
