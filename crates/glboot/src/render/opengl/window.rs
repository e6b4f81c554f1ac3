//! GLFW-based window and context backend
//!
//! The only backend. glfw owns the platform's legacy pixel-format and
//! dummy-context negotiation; this module configures it for a modern
//! core-profile context and adapts its event stream to the surface
//! event handler.

use glfw::Context;

use crate::render::window::backend::WindowBackend;
use crate::render::window::{
    SurfaceConfig, SurfaceEvent, SurfaceEventHandler, WindowError, WindowResult,
};
use std::os::raw::c_void;

/// GLFW window wrapper with its context made current at creation.
pub(crate) struct GlfwSurface {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwSurface {
    pub(crate) fn open(config: &SurfaceConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors).map_err(|err| {
            log::error!("failed to initialize the windowing system: {err}");
            WindowError::InitializationFailed
        })?;

        // Pixel format and context version are negotiated through
        // window hints; glfw performs the two-phase dummy-context
        // bootstrap the native API requires.
        let (major, minor) = config.gl_version;
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
        glfw.window_hint(glfw::WindowHint::DoubleBuffer(true));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(config.depth_bits)));
        glfw.window_hint(glfw::WindowHint::StencilBits(Some(config.stencil_bits)));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or_else(|| {
                log::error!(
                    "failed to create a {}x{} window with a {major}.{minor} core context",
                    config.width,
                    config.height
                );
                WindowError::CreationFailed
            })?;

        // Context operations are valid from here until drop.
        window.make_current();

        window.set_close_polling(true);
        window.set_size_polling(true);
        window.set_framebuffer_size_polling(true);

        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        log::info!(
            "opened {}x{} window \"{}\" with a {major}.{minor} core profile context",
            config.width,
            config.height,
            config.title
        );

        Ok(Self {
            glfw,
            window,
            events,
        })
    }
}

/// Translate one native event into a surface event, if it maps.
///
/// Close and framebuffer-resize are the only events the surface
/// surfaces; everything else is drained and dropped. The framebuffer
/// size (pixels) is used rather than the logical window size so the
/// viewport can be set from it directly.
fn translate_event(event: &glfw::WindowEvent) -> Option<SurfaceEvent> {
    match event {
        glfw::WindowEvent::Close => Some(SurfaceEvent::CloseRequested),
        glfw::WindowEvent::FramebufferSize(width, height) => Some(SurfaceEvent::Resized {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn dispatch(event: SurfaceEvent, handler: &mut dyn SurfaceEventHandler) {
    match event {
        SurfaceEvent::CloseRequested => handler.close_requested(),
        SurfaceEvent::Resized { width, height } => handler.resized(width, height),
    }
}

impl WindowBackend for GlfwSurface {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    fn poll_events(&mut self, handler: &mut dyn SurfaceEventHandler) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            if let Some(event) = translate_event(&event) {
                dispatch(event, handler);
            }
        }
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn proc_address(&mut self, name: &str) -> *const c_void {
        self.window.get_proc_address(name) as *const c_void
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHandler {
        close_requests: usize,
        resizes: Vec<(i32, i32)>,
    }

    impl SurfaceEventHandler for RecordingHandler {
        fn close_requested(&mut self) {
            self.close_requests += 1;
        }

        fn resized(&mut self, width: i32, height: i32) {
            self.resizes.push((width, height));
        }
    }

    #[test]
    fn test_close_event_reaches_the_handler() {
        let event = translate_event(&glfw::WindowEvent::Close).unwrap();
        assert_eq!(event, SurfaceEvent::CloseRequested);

        let mut handler = RecordingHandler::default();
        dispatch(event, &mut handler);
        assert_eq!(handler.close_requests, 1);
        assert!(handler.resizes.is_empty());
    }

    #[test]
    fn test_resize_carries_reported_dimensions() {
        let event = translate_event(&glfw::WindowEvent::FramebufferSize(800, 600)).unwrap();

        let mut handler = RecordingHandler::default();
        dispatch(event, &mut handler);
        assert_eq!(handler.resizes, vec![(800, 600)]);
        assert_eq!(handler.close_requests, 0);
    }

    #[test]
    fn test_unrelated_events_are_dropped() {
        assert!(translate_event(&glfw::WindowEvent::Focus(true)).is_none());
        assert!(translate_event(&glfw::WindowEvent::Refresh).is_none());
        // Logical size changes are ignored in favor of framebuffer size.
        assert!(translate_event(&glfw::WindowEvent::Size(800, 600)).is_none());
    }
}
