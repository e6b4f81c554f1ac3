//! Runtime resolution of GL entry points
//!
//! The process-wide function-pointer table lives in the `gl` crate and
//! is populated in a single pass at startup. Partial resolution is
//! observable: a slot that failed to resolve stays unloaded and keeps
//! reporting `false` from its `is_loaded` query. There is no retry and
//! no caching beyond the table itself.

use std::os::raw::c_void;

type IsLoaded = fn() -> bool;

/// Entry points the renderer requires, paired with their table slots.
///
/// A load pass succeeds only when every name here resolves.
const REQUIRED_ENTRY_POINTS: &[(&str, IsLoaded)] = &[
    ("glEnable", gl::Enable::is_loaded),
    ("glDebugMessageCallback", gl::DebugMessageCallback::is_loaded),
    ("glCreateShader", gl::CreateShader::is_loaded),
    ("glShaderSource", gl::ShaderSource::is_loaded),
    ("glCompileShader", gl::CompileShader::is_loaded),
    ("glCreateProgram", gl::CreateProgram::is_loaded),
    ("glAttachShader", gl::AttachShader::is_loaded),
    ("glLinkProgram", gl::LinkProgram::is_loaded),
    ("glDeleteProgram", gl::DeleteProgram::is_loaded),
    ("glDeleteShader", gl::DeleteShader::is_loaded),
    ("glDetachShader", gl::DetachShader::is_loaded),
    ("glGetShaderiv", gl::GetShaderiv::is_loaded),
    ("glGetProgramiv", gl::GetProgramiv::is_loaded),
    ("glGetShaderInfoLog", gl::GetShaderInfoLog::is_loaded),
    ("glGetProgramInfoLog", gl::GetProgramInfoLog::is_loaded),
    ("glCreateVertexArrays", gl::CreateVertexArrays::is_loaded),
    ("glBindVertexArray", gl::BindVertexArray::is_loaded),
    ("glCreateBuffers", gl::CreateBuffers::is_loaded),
    ("glBindBuffer", gl::BindBuffer::is_loaded),
    ("glBufferData", gl::BufferData::is_loaded),
    (
        "glEnableVertexAttribArray",
        gl::EnableVertexAttribArray::is_loaded,
    ),
    ("glVertexAttribPointer", gl::VertexAttribPointer::is_loaded),
    ("glDeleteVertexArrays", gl::DeleteVertexArrays::is_loaded),
    ("glDeleteBuffers", gl::DeleteBuffers::is_loaded),
    ("glClear", gl::Clear::is_loaded),
    ("glClearColor", gl::ClearColor::is_loaded),
    ("glViewport", gl::Viewport::is_loaded),
    ("glUseProgram", gl::UseProgram::is_loaded),
    ("glGetUniformLocation", gl::GetUniformLocation::is_loaded),
    ("glUniformMatrix4fv", gl::UniformMatrix4fv::is_loaded),
    ("glUniform4f", gl::Uniform4f::is_loaded),
    ("glDrawElements", gl::DrawElements::is_loaded),
    ("glDrawArrays", gl::DrawArrays::is_loaded),
];

/// Lookup results some drivers return to signal failure without
/// returning null.
const SENTINEL_FAILURES: [isize; 4] = [1, 2, 3, -1];

/// Outcome of one resolution pass over the required entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionReport {
    /// Names that failed to resolve, in table order.
    pub missing: Vec<&'static str>,
}

impl ExtensionReport {
    /// True when every required entry point resolved.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Number of required entry points that resolved.
    pub fn resolved(&self) -> usize {
        REQUIRED_ENTRY_POINTS.len() - self.missing.len()
    }

    /// Number of required entry points, resolved or not.
    pub fn required(&self) -> usize {
        REQUIRED_ENTRY_POINTS.len()
    }
}

/// Resolve one named entry point through `loader`.
///
/// Rejects the sentinel failure values some context-specific resolvers
/// hand back in place of null.
pub fn resolve_entry_point(
    name: &str,
    loader: &mut dyn FnMut(&str) -> *const c_void,
) -> Option<*const c_void> {
    let ptr = loader(name);
    if ptr.is_null() || SENTINEL_FAILURES.contains(&(ptr as isize)) {
        None
    } else {
        Some(ptr)
    }
}

/// Populate the entry-point table through `loader` and verify the
/// required list.
///
/// Resolution continues past individual failures so one missing name
/// does not mask the rest; every failure is logged by name and recorded
/// in the report.
pub fn load_gl_extensions<F>(mut loader: F) -> ExtensionReport
where
    F: FnMut(&str) -> *const c_void,
{
    gl::load_with(|name| {
        resolve_entry_point(name, &mut loader).unwrap_or(std::ptr::null())
    });

    let mut missing = Vec::new();
    for (name, is_loaded) in REQUIRED_ENTRY_POINTS {
        if !is_loaded() {
            log::error!("failed to load extension: {name}");
            missing.push(*name);
        }
    }

    if missing.is_empty() {
        log::info!(
            "resolved all {} required GL entry points",
            REQUIRED_ENTRY_POINTS.len()
        );
    }

    ExtensionReport { missing }
}
