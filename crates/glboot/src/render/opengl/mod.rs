//! OpenGL backend
//!
//! Everything GL-specific lives here: the glfw-backed window surface,
//! runtime resolution of the entry-point table, and shader program
//! compilation.

pub mod extensions;
pub mod shader;
pub(crate) mod window;

pub use extensions::{load_gl_extensions, resolve_entry_point, ExtensionReport};
pub use shader::{
    compile_program, LoadedGl, ShaderError, ShaderGl, ShaderProgram, ShaderResult, ShaderStage,
};
