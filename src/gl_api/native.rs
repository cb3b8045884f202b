//! Exports [`NativeGl`], the [`GlApi`] backed by the global `gl` loader.
use std::{
    ffi::{c_void, CStr},
    ptr::null,
};

use gl::types::{GLchar, GLint, GLsizei, GLsizeiptr, GLuint};

use super::{BufferTarget, Capability, ContextString, GlApi, Primitive};
use crate::{gl_wrappers::ShaderStage, render_vec::VertexAttribute};

/// Forwards every [`GlApi`] call to the function pointers resolved by
/// `gl::load_with`.
pub struct NativeGl {
    _private: (),
}

impl NativeGl {
    /// # Safety
    /// `gl::load_with` must have run against a context that is current on this
    /// thread, and that context must outlive every object created through the
    /// returned value.
    pub unsafe fn new_unchecked() -> Self {
        Self { _private: () }
    }
}

fn gl_sizei(n: usize) -> GLsizei {
    GLsizei::try_from(n).unwrap_or(GLsizei::MAX)
}

fn gl_int(n: usize) -> GLint {
    GLint::try_from(n).unwrap_or(GLint::MAX)
}

/// Reads an info log whose length is reported through `INFO_LOG_LENGTH`.
unsafe fn read_info_log(
    object: GLuint,
    get_iv: unsafe fn(GLuint, gl::types::GLenum, *mut GLint),
    get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let mut length = 0;
    get_iv(object, gl::INFO_LOG_LENGTH, &mut length);
    if length <= 0 {
        return String::new();
    }
    let mut infolog: Vec<u8> = vec![0; length as usize];
    let mut written = 0;
    get_log(object, length, &mut written, infolog.as_mut_ptr().cast());
    infolog.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&infolog).into_owned()
}

// SAFETY (whole impl):
// `NativeGl` only exists once the loader has run with a current context, and
// every pointer passed below points into a live Rust value for the duration
// of the call.
impl GlApi for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.as_gl()) }
    }
    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe { gl::ShaderSource(shader, 1, &source.as_ptr(), null()) }
    }
    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }
    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }
    fn shader_info_log(&self, shader: GLuint) -> String {
        unsafe { read_info_log(shader, gl::GetShaderiv, gl::GetShaderInfoLog) }
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
    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }
    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }
    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }
    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }
    fn program_validate_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }
    fn program_info_log(&self, program: GLuint) -> String {
        unsafe { read_info_log(program, gl::GetProgramiv, gl::GetProgramInfoLog) }
    }
    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }
    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }
    fn bind_vertex_array(&self, vao: GLuint) {
        unsafe { gl::BindVertexArray(vao) }
    }
    fn delete_vertex_array(&self, vao: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }
    fn create_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        unsafe { gl::BindBuffer(target.as_gl(), buffer) }
    }
    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let size = GLsizeiptr::try_from(data.len()).unwrap_or(GLsizeiptr::MAX);
        unsafe { gl::BufferData(target.as_gl(), size, data.as_ptr().cast(), gl::STATIC_DRAW) }
    }
    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }
    fn enable_vertex_attrib_array(&self, location: GLuint) {
        unsafe { gl::EnableVertexAttribArray(location) }
    }
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: usize) {
        unsafe {
            gl::VertexAttribPointer(
                attribute.location,
                attribute.components,
                attribute.gl_type.as_gl(),
                gl::FALSE,
                gl_sizei(stride),
                attribute.offset as *const c_void,
            )
        }
    }

    fn viewport(&self, width: u32, height: u32) {
        let width = GLsizei::try_from(width).unwrap_or(GLsizei::MAX);
        let height = GLsizei::try_from(height).unwrap_or(GLsizei::MAX);
        unsafe { gl::Viewport(0, 0, width, height) }
    }
    fn set_capability(&self, capability: Capability, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(capability.as_gl());
            } else {
                gl::Disable(capability.as_gl());
            }
        }
    }
    fn clear(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }
    fn draw_arrays(&self, mode: Primitive, first: usize, count: usize) {
        unsafe { gl::DrawArrays(mode.as_gl(), gl_int(first), gl_sizei(count)) }
    }
    fn draw_elements(&self, mode: Primitive, count: usize) {
        unsafe { gl::DrawElements(mode.as_gl(), gl_sizei(count), gl::UNSIGNED_INT, null()) }
    }

    fn context_string(&self, name: ContextString) -> Option<String> {
        unsafe {
            let raw_ptr = gl::GetString(name.as_gl());
            if raw_ptr.is_null() {
                None
            } else {
                let value = CStr::from_ptr(raw_ptr.cast::<GLchar>());
                Some(value.to_string_lossy().into_owned())
            }
        }
    }
}
