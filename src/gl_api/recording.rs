//! An in-memory [`GlApi`] for tests.
//!
//! It hands out object names, mirrors the binding state OpenGL keeps (array
//! buffer, vertex array, element buffer per vertex array, current program),
//! emulates just enough of the GLSL front end to fail on the usual typos, and
//! records every call for assertions.
use std::{cell::RefCell, collections::HashMap, ffi::CStr};

use gl::types::{GLint, GLuint};

use super::{BufferTarget, Capability, ContextString, GlApi, Primitive};
use crate::{gl_wrappers::ShaderStage, render_vec::VertexAttribute};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GlCall {
    CreateShader(ShaderStage, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader { program: GLuint, shader: GLuint },
    DetachShader { program: GLuint, shader: GLuint },
    LinkProgram(GLuint),
    ValidateProgram {
        program: GLuint,
        /// Vertex array bound when validation ran.
        vao: GLuint,
    },
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    GetUniformLocation {
        program: GLuint,
        name: String,
    },
    UniformMatrix4 {
        program: GLuint,
        location: GLint,
        value: [f32; 16],
    },
    CreateVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    CreateBuffer(GLuint),
    BindBuffer(BufferTarget, GLuint),
    BufferData {
        buffer: GLuint,
        target: BufferTarget,
        len: usize,
    },
    DeleteBuffer(GLuint),
    EnableVertexAttribArray(GLuint),
    VertexAttribPointer {
        attribute: VertexAttribute,
        stride: usize,
        /// Buffer bound to `ARRAY_BUFFER` at declaration time.
        buffer: GLuint,
    },
    Viewport(u32, u32),
    SetCapability(Capability, bool),
    Clear([f32; 4]),
    DrawArrays {
        mode: Primitive,
        first: usize,
        count: usize,
        vao: GLuint,
        element_buffer: GLuint,
    },
    DrawElements {
        mode: Primitive,
        count: usize,
        vao: GLuint,
        element_buffer: GLuint,
    },
}

impl GlCall {
    pub(crate) fn is_draw(&self) -> bool {
        matches!(
            self,
            GlCall::DrawArrays { .. } | GlCall::DrawElements { .. }
        )
    }
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<GLuint>,
    linked: bool,
    validated: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_name: GLuint,
    calls: Vec<GlCall>,
    shaders: HashMap<GLuint, FakeShader>,
    programs: HashMap<GLuint, FakeProgram>,
    /// Buffer name to byte length of its storage.
    buffers: HashMap<GLuint, usize>,
    /// Vertex array name to its element buffer binding.
    vertex_arrays: HashMap<GLuint, GLuint>,
    bound_vao: GLuint,
    array_buffer: GLuint,
    current_program: GLuint,
    fail_link: Option<String>,
    fail_validate: Option<String>,
}

impl State {
    fn name(&mut self) -> GLuint {
        self.next_name += 1;
        self.next_name
    }
    fn element_buffer(&self) -> GLuint {
        self.vertex_arrays
            .get(&self.bound_vao)
            .copied()
            .unwrap_or(0)
    }
}

pub(crate) struct RecordingGl {
    state: RefCell<State>,
}

impl RecordingGl {
    pub(crate) fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }
    pub(crate) fn draw_calls(&self) -> Vec<GlCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_draw())
            .cloned()
            .collect()
    }
    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
    /// The next link fails with `log`.
    pub(crate) fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().fail_link = Some(log.to_owned());
    }
    /// The next validation fails with `log`.
    pub(crate) fn fail_next_validate(&self, log: &str) {
        self.state.borrow_mut().fail_validate = Some(log.to_owned());
    }
    pub(crate) fn is_live_shader(&self, shader: GLuint) -> bool {
        self.state.borrow().shaders.contains_key(&shader)
    }
    pub(crate) fn program_linked(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }
    pub(crate) fn buffer_len(&self, buffer: GLuint) -> Option<usize> {
        self.state.borrow().buffers.get(&buffer).copied()
    }
    pub(crate) fn current_program(&self) -> GLuint {
        self.state.borrow().current_program
    }
    pub(crate) fn bound_vertex_array(&self) -> GLuint {
        self.state.borrow().bound_vao
    }
    /// Shaders, programs, buffers and vertex arrays not yet deleted.
    pub(crate) fn live_object_count(&self) -> usize {
        let state = self.state.borrow();
        state.shaders.len()
            + state.programs.len()
            + state.buffers.len()
            + state.vertex_arrays.len()
    }
}

const EMPTY_SOURCE: &str = "0:1(1): error: syntax error, unexpected end of file";
const NO_VERTEX_ARRAY: &str = "Validation Failed: No vertex array object bound.";

/// A deliberately small GLSL check: empty source, no `main`, or a statement
/// line that does not end in `;`.
fn check_glsl(source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Err(EMPTY_SOURCE.to_owned());
    }
    for (number, line) in source.lines().enumerate() {
        let line = line.trim();
        let structural = line.is_empty()
            || line.starts_with('#')
            || line.starts_with("//")
            || line.ends_with('{')
            || line.ends_with('}')
            || line.ends_with(';');
        if !structural {
            return Err(format!(
                "0:{}(1): error: syntax error, unexpected end of statement, expecting ',' or ';'",
                number + 1
            ));
        }
    }
    if !source.contains("void main") {
        return Err("error: no function with name 'main'".to_owned());
    }
    Ok(())
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(str::to_owned)
}

impl GlApi for RecordingGl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.name();
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        state.calls.push(GlCall::CreateShader(stage, id));
        id
    }
    fn shader_source(&self, shader: GLuint, source: &CStr) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string_lossy().into_owned();
        }
    }
    fn compile_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::CompileShader(shader));
        if let Some(s) = state.shaders.get_mut(&shader) {
            match check_glsl(&s.source) {
                Ok(()) => s.compiled = true,
                Err(log) => {
                    s.compiled = false;
                    s.log = log;
                }
            }
        }
    }
    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }
    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }
    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.name();
        state.programs.insert(id, FakeProgram::default());
        state.calls.push(GlCall::CreateProgram(id));
        id
    }
    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.push(shader);
        }
        state.calls.push(GlCall::AttachShader { program, shader });
    }
    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
        state.calls.push(GlCall::DetachShader { program, shader });
    }
    fn link_program(&self, program: GLuint) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.calls.push(GlCall::LinkProgram(program));
        let forced = state.fail_link.take();
        let attached = match state.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let stages: Vec<_> = attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .filter(|s| s.compiled)
            .collect();
        let has = |stage| stages.iter().any(|s| s.stage == stage);
        let result = match forced {
            Some(log) => Err(log),
            None if !has(ShaderStage::Vertex) => {
                Err("error: program lacks a compiled vertex shader".to_owned())
            }
            None if !has(ShaderStage::Fragment) => {
                Err("error: program lacks a compiled fragment shader".to_owned())
            }
            None => Ok(()),
        };
        let mut uniforms = Vec::new();
        for stage in &stages {
            for name in declared_uniforms(&stage.source) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }
        if let Some(p) = state.programs.get_mut(&program) {
            match result {
                Ok(()) => {
                    p.linked = true;
                    p.uniforms = uniforms;
                }
                Err(log) => {
                    p.linked = false;
                    p.log = log;
                }
            }
        }
    }
    fn program_link_status(&self, program: GLuint) -> bool {
        self.program_linked(program)
    }
    fn validate_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let vao = state.bound_vao;
        state.calls.push(GlCall::ValidateProgram { program, vao });
        // core profile drivers refuse to validate without a vertex array bound
        let forced = match state.fail_validate.take() {
            None if state.bound_vao == 0 => Some(NO_VERTEX_ARRAY.to_owned()),
            forced => forced,
        };
        if let Some(p) = state.programs.get_mut(&program) {
            p.validated = p.linked && forced.is_none();
            if let Some(log) = forced {
                p.log = log;
            }
        }
    }
    fn program_validate_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.validated)
    }
    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }
    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.current_program = program;
        state.calls.push(GlCall::UseProgram(program));
    }
    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.calls.push(GlCall::DeleteProgram(program));
    }
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let mut state = self.state.borrow_mut();
        let name = name.to_string_lossy().into_owned();
        let location = state
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| *u == name))
            .map_or(-1, |i| i as GLint);
        let call = GlCall::GetUniformLocation { program, name };
        state.calls.push(call);
        location
    }
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        let mut state = self.state.borrow_mut();
        let program = state.current_program;
        state.calls.push(GlCall::UniformMatrix4 {
            program,
            location,
            value: *value,
        });
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.name();
        state.vertex_arrays.insert(id, 0);
        state.calls.push(GlCall::CreateVertexArray(id));
        id
    }
    fn bind_vertex_array(&self, vao: GLuint) {
        let mut state = self.state.borrow_mut();
        state.bound_vao = vao;
        state.calls.push(GlCall::BindVertexArray(vao));
    }
    fn delete_vertex_array(&self, vao: GLuint) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vao);
        if state.bound_vao == vao {
            state.bound_vao = 0;
        }
        state.calls.push(GlCall::DeleteVertexArray(vao));
    }
    fn create_buffer(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.name();
        state.buffers.insert(id, 0);
        state.calls.push(GlCall::CreateBuffer(id));
        id
    }
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        match target {
            BufferTarget::Array => state.array_buffer = buffer,
            BufferTarget::ElementArray => {
                let vao = state.bound_vao;
                if let Some(binding) = state.vertex_arrays.get_mut(&vao) {
                    *binding = buffer;
                }
            }
        }
        state.calls.push(GlCall::BindBuffer(target, buffer));
    }
    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let buffer = match target {
            BufferTarget::Array => state.array_buffer,
            BufferTarget::ElementArray => state.element_buffer(),
        };
        if let Some(len) = state.buffers.get_mut(&buffer) {
            *len = data.len();
        }
        state.calls.push(GlCall::BufferData {
            buffer,
            target,
            len: data.len(),
        });
    }
    fn delete_buffer(&self, buffer: GLuint) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        if state.array_buffer == buffer {
            state.array_buffer = 0;
        }
        state.calls.push(GlCall::DeleteBuffer(buffer));
    }
    fn enable_vertex_attrib_array(&self, location: GLuint) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::EnableVertexAttribArray(location));
    }
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute, stride: usize) {
        let mut state = self.state.borrow_mut();
        let buffer = state.array_buffer;
        state.calls.push(GlCall::VertexAttribPointer {
            attribute: *attribute,
            stride,
            buffer,
        });
    }

    fn viewport(&self, width: u32, height: u32) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::Viewport(width, height));
    }
    fn set_capability(&self, capability: Capability, enabled: bool) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::SetCapability(capability, enabled));
    }
    fn clear(&self, color: [f32; 4]) {
        self.state.borrow_mut().calls.push(GlCall::Clear(color));
    }
    fn draw_arrays(&self, mode: Primitive, first: usize, count: usize) {
        let mut state = self.state.borrow_mut();
        let call = GlCall::DrawArrays {
            mode,
            first,
            count,
            vao: state.bound_vao,
            element_buffer: state.element_buffer(),
        };
        state.calls.push(call);
    }
    fn draw_elements(&self, mode: Primitive, count: usize) {
        let mut state = self.state.borrow_mut();
        let call = GlCall::DrawElements {
            mode,
            count,
            vao: state.bound_vao,
            element_buffer: state.element_buffer(),
        };
        state.calls.push(call);
    }

    fn context_string(&self, name: ContextString) -> Option<String> {
        Some(
            match name {
                ContextString::Vendor => "sdl_gl_demos",
                ContextString::Renderer => "recording",
                ContextString::Version => "4.1 (recording)",
                ContextString::ShadingLanguageVersion => "4.10",
            }
            .to_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::check_glsl;

    #[test]
    fn glsl_check_points_at_offending_line() {
        let err = check_glsl("#version 410 core\nvoid main() {\n    float x = 1.0\n}\n")
            .unwrap_err();
        assert!(err.starts_with("0:3(1)"), "{err}");
    }
}
