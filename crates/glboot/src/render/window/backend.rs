//! Backend-agnostic window surface trait
//!
//! Internal contract between the public `WindowSurface` handle and the
//! concrete windowing backend. Not exposed to applications.

use super::SurfaceEventHandler;
use std::os::raw::c_void;

/// Internal trait every window backend implements.
///
/// The interface is deliberately minimal: create/destroy live on the
/// concrete type (destroy through `Drop`), and everything the
/// application loop needs at runtime goes through here.
pub(crate) trait WindowBackend {
    /// True once the user or the application has requested closure.
    fn should_close(&self) -> bool;

    /// Programmatically request (or cancel) closure.
    fn set_should_close(&mut self, should_close: bool);

    /// Drain the native event queue without blocking, dispatching
    /// translated events to `handler` synchronously.
    fn poll_events(&mut self, handler: &mut dyn SurfaceEventHandler);

    /// Present the back buffer.
    fn swap_buffers(&mut self);

    /// Resolve a named GL entry point against the current context.
    ///
    /// Returns null when the name cannot be resolved.
    fn proc_address(&mut self, name: &str) -> *const c_void;

    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);
}
