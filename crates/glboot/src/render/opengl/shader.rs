//! Shader program compilation
//!
//! A strict two-phase compile-then-link pass over a vertex/fragment
//! source pair. The slice of GL it touches is narrowed to the
//! [`ShaderGl`] trait so the state machine can be exercised without a
//! live context; [`LoadedGl`] is the production implementation over the
//! resolved entry-point table.

use std::ffi::CStr;
use std::path::Path;
use thiserror::Error;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

use crate::fs::{self, SourceError};

/// Diagnostic text is retrieved into this much space and therefore
/// capped at 511 characters plus the terminator.
const INFO_LOG_CAPACITY: usize = 512;

/// Shader stages the compiler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// The slice of the GL API the shader compiler and draw path use.
///
/// Exposing only these entry points keeps the compiler testable: the
/// unit tests drive it with a counting double instead of a context.
pub trait ShaderGl {
    /// Create an empty shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    /// Replace the source of `shader`.
    fn shader_source(&self, shader: GLuint, source: &CStr);
    /// Compile `shader`.
    fn compile_shader(&self, shader: GLuint);
    /// Query the boolean compile status of `shader`.
    fn compile_succeeded(&self, shader: GLuint) -> bool;
    /// Retrieve the compile diagnostic text for `shader`.
    fn shader_info_log(&self, shader: GLuint) -> String;
    /// Delete `shader`.
    fn delete_shader(&self, shader: GLuint);

    /// Create an empty program object.
    fn create_program(&self) -> GLuint;
    /// Attach `shader` to `program`.
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// Link `program`.
    fn link_program(&self, program: GLuint);
    /// Query the boolean link status of `program`.
    fn link_succeeded(&self, program: GLuint) -> bool;
    /// Retrieve the link diagnostic text for `program`.
    fn program_info_log(&self, program: GLuint) -> String;
    /// Detach `shader` from `program`.
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    /// Delete `program`.
    fn delete_program(&self, program: GLuint);

    /// Bind `program` for subsequent draw calls.
    fn use_program(&self, program: GLuint);
    /// Look up a named uniform in `program`, if the linker kept it.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint>;
    /// Set a vec4 color uniform.
    fn set_uniform_color(&self, location: GLint, rgba: [f32; 4]);
}

/// Production [`ShaderGl`] backed by the loaded entry-point table.
///
/// Only valid after `load_gl_extensions` reported a complete table on
/// the thread owning the current context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadedGl;

fn log_from_buffer(buffer: &[GLchar], written: GLsizei) -> String {
    let len = written.clamp(0, (buffer.len() - 1) as GLsizei) as usize;
    let bytes: Vec<u8> = buffer[..len].iter().map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

impl ShaderGl for LoadedGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        let ptr = source.as_ptr();
        unsafe { gl::ShaderSource(shader, 1, &ptr, std::ptr::null()) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_succeeded(&self, shader: GLuint) -> bool {
        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status != GLint::from(gl::FALSE)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut buffer = [0 as GLchar; INFO_LOG_CAPACITY];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                INFO_LOG_CAPACITY as GLsizei,
                &mut written,
                buffer.as_mut_ptr(),
            );
        }
        log_from_buffer(&buffer, written)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_succeeded(&self, program: GLuint) -> bool {
        let mut status = GLint::from(gl::FALSE);
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status != GLint::from(gl::FALSE)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut buffer = [0 as GLchar; INFO_LOG_CAPACITY];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                INFO_LOG_CAPACITY as GLsizei,
                &mut written,
                buffer.as_mut_ptr(),
            );
        }
        log_from_buffer(&buffer, written)
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> Option<GLint> {
        let location = unsafe { gl::GetUniformLocation(program, name.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn set_uniform_color(&self, location: GLint, rgba: [f32; 4]) {
        unsafe { gl::Uniform4f(location, rgba[0], rgba[1], rgba[2], rgba[3]) }
    }
}

/// Handle to a linked GPU program object.
///
/// Plain handle, no drop glue: the owner deletes it through
/// [`ShaderGl::delete_program`] during teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram(GLuint);

impl ShaderProgram {
    /// The raw program object name.
    pub fn id(self) -> GLuint {
        self.0
    }
}

/// Shader build failures, one per terminal state of the pass.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// A source file could not be read.
    #[error("failed to read shader source: {0}")]
    Source(#[from] SourceError),

    /// The vertex stage did not compile; carries the diagnostic text.
    #[error("failed to compile vertex shader: {0}")]
    VertexCompile(String),

    /// The fragment stage did not compile; carries the diagnostic text.
    #[error("failed to compile fragment shader: {0}")]
    FragmentCompile(String),

    /// The two stages did not link; carries the diagnostic text.
    #[error("failed to link program: {0}")]
    Link(String),
}

/// Result alias for shader compilation.
pub type ShaderResult<T> = Result<T, ShaderError>;

/// A compiled stage object, deleted when the guard leaves scope.
struct StageObject<'a, G: ShaderGl> {
    gl: &'a G,
    id: GLuint,
}

impl<'a, G: ShaderGl> StageObject<'a, G> {
    /// Compile `source` as `stage`; on failure the diagnostic is
    /// returned and the shader object is already released.
    fn compile(gl: &'a G, stage: ShaderStage, source: &CStr) -> Result<Self, String> {
        let object = Self {
            gl,
            id: gl.create_shader(stage),
        };
        gl.shader_source(object.id, source);
        gl.compile_shader(object.id);

        if gl.compile_succeeded(object.id) {
            Ok(object)
        } else {
            Err(gl.shader_info_log(object.id))
        }
    }
}

impl<G: ShaderGl> Drop for StageObject<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A program object that deletes itself unless the link succeeded.
struct ProgramObject<'a, G: ShaderGl> {
    gl: &'a G,
    id: GLuint,
    linked: bool,
}

impl<'a, G: ShaderGl> ProgramObject<'a, G> {
    fn create(gl: &'a G) -> Self {
        Self {
            gl,
            id: gl.create_program(),
            linked: false,
        }
    }

    fn into_handle(mut self) -> ShaderProgram {
        self.linked = true;
        ShaderProgram(self.id)
    }
}

impl<G: ShaderGl> Drop for ProgramObject<'_, G> {
    fn drop(&mut self) {
        if !self.linked {
            self.gl.delete_program(self.id);
        }
    }
}

/// Build a program from a vertex/fragment source pair.
///
/// Strict two-phase pass: the fragment stage is not read or compiled
/// when the vertex stage fails, and the link only runs once both
/// stages compiled. Every object created up to a failure is released
/// on the way out; on success the now-unneeded stage objects are
/// detached and deleted and only the linked program survives.
pub fn compile_program<G: ShaderGl>(
    gl: &G,
    vertex_path: &Path,
    fragment_path: &Path,
) -> ShaderResult<ShaderProgram> {
    let vertex_source = fs::read_source_file(vertex_path)?;
    let vertex = StageObject::compile(gl, ShaderStage::Vertex, &vertex_source).map_err(|diag| {
        log::error!("failed to compile vertex shader: {diag}");
        ShaderError::VertexCompile(diag)
    })?;

    let fragment_source = fs::read_source_file(fragment_path)?;
    let fragment =
        StageObject::compile(gl, ShaderStage::Fragment, &fragment_source).map_err(|diag| {
            log::error!("failed to compile fragment shader: {diag}");
            ShaderError::FragmentCompile(diag)
        })?;

    let program = ProgramObject::create(gl);
    gl.attach_shader(program.id, vertex.id);
    gl.attach_shader(program.id, fragment.id);
    gl.link_program(program.id);

    if !gl.link_succeeded(program.id) {
        let diag = gl.program_info_log(program.id);
        log::error!("failed to link program: {diag}");
        return Err(ShaderError::Link(diag));
    }

    gl.detach_shader(program.id, vertex.id);
    gl.detach_shader(program.id, fragment.id);

    log::info!("shaders compiled and linked successfully");
    Ok(program.into_handle())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VERTEX_SRC: &[u8] = b"#version 460 core\nlayout (location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n";
    const FRAGMENT_SRC: &[u8] =
        b"#version 460 core\nout vec4 FragColor;\nuniform vec4 u_Color;\nvoid main() { FragColor = u_Color; }\n";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        CompileVertex,
        CompileFragment,
        Attach(GLuint),
        Link,
        Detach(GLuint),
        DeleteShader(GLuint),
        DeleteProgram,
    }

    /// Counting double for the GL slice the compiler uses.
    #[derive(Default)]
    struct FakeGl {
        fail_vertex: bool,
        fail_fragment: bool,
        fail_link: bool,
        state: RefCell<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        next_id: GLuint,
        stages: Vec<(GLuint, ShaderStage)>,
        live_shaders: Vec<GLuint>,
        live_programs: Vec<GLuint>,
        ops: Vec<Op>,
    }

    impl FakeGl {
        fn stage_of(&self, shader: GLuint) -> ShaderStage {
            self.state
                .borrow()
                .stages
                .iter()
                .find(|(id, _)| *id == shader)
                .map(|(_, stage)| *stage)
                .expect("unknown shader object")
        }

        fn compile_count(&self, op: Op) -> usize {
            self.state.borrow().ops.iter().filter(|o| **o == op).count()
        }
    }

    impl ShaderGl for FakeGl {
        fn create_shader(&self, stage: ShaderStage) -> GLuint {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.stages.push((id, stage));
            state.live_shaders.push(id);
            id
        }

        fn shader_source(&self, _shader: GLuint, _source: &CStr) {}

        fn compile_shader(&self, shader: GLuint) {
            let op = match self.stage_of(shader) {
                ShaderStage::Vertex => Op::CompileVertex,
                ShaderStage::Fragment => Op::CompileFragment,
            };
            self.state.borrow_mut().ops.push(op);
        }

        fn compile_succeeded(&self, shader: GLuint) -> bool {
            match self.stage_of(shader) {
                ShaderStage::Vertex => !self.fail_vertex,
                ShaderStage::Fragment => !self.fail_fragment,
            }
        }

        fn shader_info_log(&self, _shader: GLuint) -> String {
            "synthetic stage diagnostic".to_string()
        }

        fn delete_shader(&self, shader: GLuint) {
            let mut state = self.state.borrow_mut();
            state.live_shaders.retain(|&id| id != shader);
            state.ops.push(Op::DeleteShader(shader));
        }

        fn create_program(&self) -> GLuint {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            state.live_programs.push(id);
            id
        }

        fn attach_shader(&self, _program: GLuint, shader: GLuint) {
            self.state.borrow_mut().ops.push(Op::Attach(shader));
        }

        fn link_program(&self, _program: GLuint) {
            self.state.borrow_mut().ops.push(Op::Link);
        }

        fn link_succeeded(&self, _program: GLuint) -> bool {
            !self.fail_link
        }

        fn program_info_log(&self, _program: GLuint) -> String {
            "synthetic link diagnostic".to_string()
        }

        fn detach_shader(&self, _program: GLuint, shader: GLuint) {
            self.state.borrow_mut().ops.push(Op::Detach(shader));
        }

        fn delete_program(&self, program: GLuint) {
            let mut state = self.state.borrow_mut();
            state.live_programs.retain(|&id| id != program);
            state.ops.push(Op::DeleteProgram);
        }

        fn use_program(&self, _program: GLuint) {}

        fn uniform_location(&self, program: GLuint, _name: &CStr) -> Option<GLint> {
            self.state
                .borrow()
                .live_programs
                .contains(&program)
                .then_some(0)
        }

        fn set_uniform_color(&self, _location: GLint, _rgba: [f32; 4]) {}
    }

    fn source_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_vertex_failure_skips_fragment_stage() {
        let vertex = source_file(b"#version 460 core\nthis is not glsl\n");
        let fragment = source_file(FRAGMENT_SRC);
        let gl = FakeGl {
            fail_vertex: true,
            ..FakeGl::default()
        };

        let result = compile_program(&gl, vertex.path(), fragment.path());

        assert!(matches!(result, Err(ShaderError::VertexCompile(_))));
        assert_eq!(gl.compile_count(Op::CompileVertex), 1);
        assert_eq!(gl.compile_count(Op::CompileFragment), 0);

        let state = gl.state.borrow();
        assert!(state.live_shaders.is_empty(), "stage object leaked");
        assert!(state.live_programs.is_empty(), "program object created early");
    }

    #[test]
    fn test_fragment_failure_releases_both_stages() {
        let vertex = source_file(VERTEX_SRC);
        let fragment = source_file(b"#version 460 core\nthis is not glsl\n");
        let gl = FakeGl {
            fail_fragment: true,
            ..FakeGl::default()
        };

        let result = compile_program(&gl, vertex.path(), fragment.path());

        assert!(matches!(result, Err(ShaderError::FragmentCompile(diag)) if diag.contains("diagnostic")));
        assert_eq!(gl.compile_count(Op::CompileVertex), 1);
        assert_eq!(gl.compile_count(Op::CompileFragment), 1);
        assert!(gl.state.borrow().live_shaders.is_empty());
        assert!(gl.state.borrow().live_programs.is_empty());
    }

    #[test]
    fn test_link_failure_releases_everything() {
        let vertex = source_file(VERTEX_SRC);
        let fragment = source_file(FRAGMENT_SRC);
        let gl = FakeGl {
            fail_link: true,
            ..FakeGl::default()
        };

        let result = compile_program(&gl, vertex.path(), fragment.path());

        assert!(matches!(result, Err(ShaderError::Link(_))));
        let state = gl.state.borrow();
        assert!(state.live_shaders.is_empty(), "stage objects leaked");
        assert!(state.live_programs.is_empty(), "program object leaked");
    }

    #[test]
    fn test_success_detaches_then_deletes_stages() {
        let vertex = source_file(VERTEX_SRC);
        let fragment = source_file(FRAGMENT_SRC);
        let gl = FakeGl::default();

        let program = compile_program(&gl, vertex.path(), fragment.path()).unwrap();

        let state = gl.state.borrow();
        assert!(state.live_shaders.is_empty());
        assert_eq!(state.live_programs, vec![program.id()]);

        // Both stages detach before either deletes.
        let first_detach = state.ops.iter().position(|op| matches!(op, Op::Detach(_)));
        let first_delete = state
            .ops
            .iter()
            .position(|op| matches!(op, Op::DeleteShader(_)));
        assert!(first_detach.unwrap() < first_delete.unwrap());
        assert_eq!(
            state.ops.iter().filter(|op| matches!(op, Op::Detach(_))).count(),
            2
        );
    }

    #[test]
    fn test_linked_program_exposes_color_uniform() {
        let vertex = source_file(VERTEX_SRC);
        let fragment = source_file(FRAGMENT_SRC);
        let gl = FakeGl::default();

        let program = compile_program(&gl, vertex.path(), fragment.path()).unwrap();

        let name = CStr::from_bytes_with_nul(b"u_Color\0").unwrap();
        assert!(gl.uniform_location(program.id(), name).is_some());
    }

    #[test]
    fn test_missing_vertex_source_touches_no_gl_state() {
        let fragment = source_file(FRAGMENT_SRC);
        let gl = FakeGl::default();

        let result = compile_program(&gl, Path::new("no/such/file.vert.glsl"), fragment.path());

        assert!(matches!(result, Err(ShaderError::Source(_))));
        assert!(gl.state.borrow().ops.is_empty());
        assert!(gl.state.borrow().live_shaders.is_empty());
    }
}
