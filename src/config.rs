//! Startup configuration for the demo binaries.
use std::path::PathBuf;

use crate::renderer::MissingUniformPolicy;

pub const OPENGL_MAJOR_VER: u8 = 4;
pub const OPENGL_MINOR_VER: u8 = 1;
pub const DEPTH_BITS: u8 = 24;

pub const START_WIDTH: u32 = 640;
pub const START_HEIGHT: u32 = 480;
/// Top-left corner of the window on screen.
pub const START_POSITION: (i32, i32) = (40, 40);

pub const CLEAR_COLOR: [f32; 4] = [0.61, 0.53, 0.83, 1.0];

/// How far the quad moves per frame while a key is held.
pub const OFFSET_STEP: f32 = 0.01;
/// Starting Z of the quad, far enough in front of the near plane to be visible.
pub const INITIAL_OFFSET: f32 = -2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gl_version: (u8, u8),
    pub depth_bits: u8,
    /// Wait for vertical sync on every buffer swap.
    pub vsync: bool,
    /// Route driver debug messages into the log when the context supports it.
    pub debug_output: bool,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub clear_color: [f32; 4],
    pub missing_uniform: MissingUniformPolicy,
    pub initial_offset: f32,
    pub offset_step: f32,
}

impl AppConfig {
    /// Settings shared by both demos, reading shaders from `shaders/<scene>/`.
    fn for_scene(scene: &str, title: &str) -> Self {
        let dir = PathBuf::from("shaders").join(scene);
        Self {
            title: title.to_owned(),
            width: START_WIDTH,
            height: START_HEIGHT,
            gl_version: (OPENGL_MAJOR_VER, OPENGL_MINOR_VER),
            depth_bits: DEPTH_BITS,
            vsync: true,
            debug_output: cfg!(debug_assertions),
            vertex_shader: dir.join("vert.glsl"),
            fragment_shader: dir.join("frag.glsl"),
            clear_color: CLEAR_COLOR,
            missing_uniform: MissingUniformPolicy::Fatal,
            initial_offset: INITIAL_OFFSET,
            offset_step: OFFSET_STEP,
        }
    }
    pub fn triangle() -> Self {
        Self::for_scene("triangle", "OpenGL Progrum")
    }
    pub fn quad() -> Self {
        Self::for_scene("quad", "OpenGL Progrum: indexed quad")
    }

    /// Apply command line arguments (program name already skipped).
    ///
    /// Positional: `[VERTEX_SHADER [FRAGMENT_SHADER]]`. `--warn-missing-uniforms`
    /// switches the missing uniform policy to [`MissingUniformPolicy::WarnOnce`],
    /// `--no-vsync` disables vertical sync.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = 0;
        for arg in args.into_iter().map(Into::into) {
            match arg.as_str() {
                "--warn-missing-uniforms" => self.missing_uniform = MissingUniformPolicy::WarnOnce,
                "--no-vsync" => self.vsync = false,
                _ => {
                    match positional {
                        0 => self.vertex_shader = PathBuf::from(arg),
                        1 => self.fragment_shader = PathBuf::from(arg),
                        _ => log::warn!("Ignoring extra argument {arg:?}"),
                    }
                    positional += 1;
                }
            }
        }
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
