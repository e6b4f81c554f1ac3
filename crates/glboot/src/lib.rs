//! # glboot
//!
//! Minimal OpenGL bootstrap: a native window with a modern core-profile
//! context, runtime resolution of the GL entry-point table, and shader
//! program compilation.
//!
//! The windowing backend is isolated behind [`WindowSurface`] so the
//! application logic never touches platform types; only one backend
//! exists, but nothing outside `render::opengl` knows which.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glboot::render::opengl::load_gl_extensions;
//! use glboot::{SurfaceConfig, WindowSurface};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut surface = WindowSurface::open(&SurfaceConfig::default())?;
//!
//!     let report = load_gl_extensions(|name| surface.proc_address(name));
//!     assert!(report.is_complete(), "missing: {:?}", report.missing);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod fs;
pub mod render;

pub use render::window::{
    SurfaceConfig, SurfaceEvent, SurfaceEventHandler, WindowError, WindowResult, WindowSurface,
};
