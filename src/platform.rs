//! SDL window, OpenGL context and event queue, owned by one value.
use std::{
    ffi::{c_char, c_void, CStr},
    ptr::null,
    rc::Rc,
};

use sdl2::{
    event::Event,
    keyboard::{Keycode, Scancode},
    video::{GLContext, GLProfile, SwapInterval, Window},
    EventPump, Sdl, VideoSubsystem,
};

use crate::{
    config::{AppConfig, START_POSITION},
    error::{RenderError, SetupStage},
    gl_api::{ContextString, Gl, NativeGl},
    renderer::Present,
    scene::FrameInput,
};

/// Everything SDL hands out for one window.
///
/// Fields drop top to bottom: the GL handle and event pump first, then the
/// context, then the window, and SDL itself last.
pub struct Platform {
    gl: Gl,
    event_pump: EventPump,
    _gl_context: GLContext,
    window: Window,
    _video: VideoSubsystem,
    _sdl: Sdl,
}

fn setup(stage: SetupStage) -> impl FnOnce(String) -> RenderError {
    move |message| RenderError::Setup { stage, message }
}

extern "system" fn gl_debug_output(
    _source: gl::types::GLenum,
    _output_type: gl::types::GLenum,
    id: gl::types::GLuint,
    severity: gl::types::GLenum,
    _length: gl::types::GLsizei,
    message: *const c_char,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    // SAFETY: the driver passes a NUL-terminated string valid for this call.
    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    match severity {
        gl::DEBUG_SEVERITY_HIGH => log::error!("GL debug [{id}]: {message}"),
        gl::DEBUG_SEVERITY_MEDIUM => log::warn!("GL debug [{id}]: {message}"),
        _ => log::debug!("GL debug [{id}]: {message}"),
    }
}

impl Platform {
    /// Bring up SDL, the window and a current OpenGL context.
    ///
    /// # Errors
    /// Each failing step maps to its own [`SetupStage`]. Whatever was created
    /// before the failure is released on return.
    pub fn init(config: &AppConfig) -> Result<Self, RenderError> {
        let sdl = sdl2::init().map_err(setup(SetupStage::Subsystem))?;
        let video = sdl.video().map_err(setup(SetupStage::Subsystem))?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        let (major, minor) = config.gl_version;
        gl_attr.set_context_version(major, minor);
        gl_attr.set_double_buffer(true);
        gl_attr.set_depth_size(config.depth_bits);
        if config.debug_output {
            gl_attr.set_context_flags().debug().set();
        }

        let window = video
            .window(&config.title, config.width, config.height)
            .position(START_POSITION.0, START_POSITION.1)
            .opengl()
            .build()
            .map_err(|e| setup(SetupStage::Window)(e.to_string()))?;

        let gl_context = window
            .gl_create_context()
            .map_err(setup(SetupStage::Context))?;
        window
            .gl_make_current(&gl_context)
            .map_err(setup(SetupStage::Context))?;

        gl::load_with(|s| video.gl_get_proc_address(s).cast());
        if !gl::Viewport::is_loaded() || !gl::CreateProgram::is_loaded() {
            return Err(RenderError::Setup {
                stage: SetupStage::Loader,
                message: String::from("OpenGL entry points could not be resolved"),
            });
        }

        let swap = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video.gl_set_swap_interval(swap) {
            log::warn!("Could not set swap interval: {e}");
        }

        if config.debug_output && gl::DebugMessageCallback::is_loaded() {
            // SAFETY: the callback only reads its arguments and never calls back into GL.
            unsafe {
                gl::Enable(gl::DEBUG_OUTPUT);
                gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
                gl::DebugMessageCallback(Some(gl_debug_output), null());
            }
            log::debug!("GL debug output enabled");
        }

        // SAFETY: the loader ran above against `gl_context`, which is current
        // and is owned by the returned `Platform` alongside this handle.
        let gl: Gl = Rc::new(unsafe { NativeGl::new_unchecked() });
        log_context_info(&gl);

        let event_pump = sdl.event_pump().map_err(setup(SetupStage::Subsystem))?;

        Ok(Self {
            gl,
            event_pump,
            _gl_context: gl_context,
            window,
            _video: video,
            _sdl: sdl,
        })
    }

    pub fn gl(&self) -> Gl {
        Gl::clone(&self.gl)
    }

    /// Framebuffer size in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    /// Drain the event queue and sample the keys the scenes care about.
    pub fn poll_input(&mut self) -> FrameInput {
        let mut input = FrameInput::default();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    input.quit = true;
                }
                _ => {}
            }
        }
        let keys = self.event_pump.keyboard_state();
        input.up = keys.is_scancode_pressed(Scancode::Up);
        input.down = keys.is_scancode_pressed(Scancode::Down);
        input
    }
}

impl Present for Platform {
    fn present(&mut self) {
        self.window.gl_swap_window();
    }
}

fn log_context_info(gl: &Gl) {
    for (label, name) in [
        ("Vendor", ContextString::Vendor),
        ("Renderer", ContextString::Renderer),
        ("Version", ContextString::Version),
        ("Shading language", ContextString::ShadingLanguageVersion),
    ] {
        match gl.context_string(name) {
            Some(value) => log::info!("{label}: {value}"),
            None => log::warn!("{label}: <unavailable>"),
        }
    }
}
