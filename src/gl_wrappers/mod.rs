//! Standalone functions and modules to wrap the nitty-gritty of
//! OpenGL objects with Rust structs.
pub mod program;
pub mod shader;

pub use program::*;
pub use shader::*;

use crate::gl_api::Gl;

/// Update the OpenGL viewport to cover a `width` x `height` framebuffer.
pub fn gl_upd_viewport(gl: &Gl, width: u32, height: u32) {
    gl.viewport(width, height);
}
