//! Flat-colored quad demo
//!
//! Opens a core-profile OpenGL window, resolves the entry-point table,
//! compiles the flat shader pair, and draws an indexed quad until the
//! window is closed.

mod app;
mod quad;

use std::ffi::CStr;
use std::path::Path;

use glboot::render::opengl::{compile_program, load_gl_extensions, LoadedGl, ShaderGl};
use glboot::{SurfaceConfig, WindowSurface};

use crate::app::QuadApp;
use crate::quad::QuadGeometry;

const VERTEX_SHADER_PATH: &str = "assets/shaders/flat_shader.vert.glsl";
const FRAGMENT_SHADER_PATH: &str = "assets/shaders/flat_shader.frag.glsl";

const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const QUAD_COLOR: [f32; 4] = [1.0, 0.5, 0.2, 1.0];

/// Startup failures this early have nothing to fall back to: log and
/// leave with a non-zero status.
fn fatal(message: &str) -> ! {
    log::error!("{message}");
    std::process::exit(1);
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("application initialized");

    let config = SurfaceConfig::default();
    let mut surface = match WindowSurface::open(&config) {
        Ok(surface) => surface,
        Err(err) => fatal(&format!("failed to create window surface: {err}")),
    };

    let report = load_gl_extensions(|name| surface.proc_address(name));
    if !report.is_complete() {
        fatal(&format!(
            "failed to load GL extensions: {} of {} unresolved",
            report.missing.len(),
            report.required()
        ));
    }
    log::info!("GL extensions loaded successfully");

    let gl = LoadedGl;
    let program = match compile_program(
        &gl,
        Path::new(VERTEX_SHADER_PATH),
        Path::new(FRAGMENT_SHADER_PATH),
    ) {
        Ok(program) => program,
        Err(err) => fatal(&format!("failed to build flat shader program: {err}")),
    };

    let geometry = QuadGeometry::upload();
    let mut app = QuadApp::new();
    let color_uniform = CStr::from_bytes_with_nul(b"u_Color\0").unwrap();

    while app.running() {
        unsafe {
            gl::ClearColor(
                CLEAR_COLOR[0],
                CLEAR_COLOR[1],
                CLEAR_COLOR[2],
                CLEAR_COLOR[3],
            );
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        gl.use_program(program.id());
        if let Some(location) = gl.uniform_location(program.id(), color_uniform) {
            gl.set_uniform_color(location, QUAD_COLOR);
        }
        geometry.draw();

        surface.swap_buffers();
        surface.poll_events(&mut app);
    }

    // Reverse acquisition order: geometry, program, then the surface.
    drop(geometry);
    gl.delete_program(program.id());
    drop(surface);

    log::info!("application shutdown");
}
