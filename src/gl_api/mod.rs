//! The slice of OpenGL this crate talks to, behind a trait.
//!
//! Every wrapper holds a [`Gl`] handle instead of reaching for global state,
//! so a test can hand the whole pipeline a [`recording`] context.
use std::{ffi::CStr, rc::Rc};

use gl::types::{GLenum, GLint, GLuint};

use crate::{gl_wrappers::ShaderStage, render_vec::VertexAttribute};

mod native;
#[cfg(test)]
pub(crate) mod recording;

pub use native::NativeGl;

/// Shared handle to the graphics API.
pub type Gl = Rc<dyn GlApi>;

/// Binding points for buffer objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub const fn as_gl(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Primitive assembly mode for a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

impl Primitive {
    pub const fn as_gl(self) -> GLenum {
        match self {
            Primitive::Triangles => gl::TRIANGLES,
        }
    }
}

/// Fixed-function switches toggled by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
    CullFace,
}

impl Capability {
    pub const fn as_gl(self) -> GLenum {
        match self {
            Capability::DepthTest => gl::DEPTH_TEST,
            Capability::CullFace => gl::CULL_FACE,
        }
    }
}

/// Context strings queried once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextString {
    Vendor,
    Renderer,
    Version,
    ShadingLanguageVersion,
}

impl ContextString {
    pub const fn as_gl(self) -> GLenum {
        match self {
            ContextString::Vendor => gl::VENDOR,
            ContextString::Renderer => gl::RENDERER,
            ContextString::Version => gl::VERSION,
            ContextString::ShadingLanguageVersion => gl::SHADING_LANGUAGE_VERSION,
        }
    }
}

/// OpenGL entry points, one method per call.
///
/// Object names are plain `GLuint`s; `0` means "none" exactly as it does in
/// OpenGL, and the wrappers in [`gl_wrappers`](crate::gl_wrappers) and
/// [`geometry`](crate::geometry) never hand a `0` out.
pub trait GlApi {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn program_validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    /// Pass `0` to deselect.
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);
    /// Returns `-1` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    /// Column-major 4x4 matrix upload to the currently selected program.
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]);

    fn create_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);
    fn create_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint);
    /// Fills the buffer bound to `target` once, with `STATIC_DRAW` usage.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: GLuint);
    fn enable_vertex_attrib_array(&self, location: GLuint);
    /// Declares `attribute` against whatever buffer is bound to `ARRAY_BUFFER`.
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: usize);

    fn viewport(&self, width: u32, height: u32);
    fn set_capability(&self, capability: Capability, enabled: bool);
    fn clear(&self, color: [f32; 4]);
    fn draw_arrays(&self, mode: Primitive, first: usize, count: usize);
    /// Draws `count` `u32` indices from the element buffer of the bound vertex array.
    fn draw_elements(&self, mode: Primitive, count: usize);

    fn context_string(&self, name: ContextString) -> Option<String>;
}
