//! Rendering subsystem: window surface management and the OpenGL
//! bootstrap (entry-point loading and shader compilation).

pub mod opengl;
pub mod window;

pub use window::WindowSurface;
