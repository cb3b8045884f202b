//! Exports [`Program`].
use std::ffi::{CStr, CString};

use gl::types::{GLint, GLuint};

use super::{CompiledShader, Shader, ShaderStage};
use crate::{error::RenderError, geometry::Mesh, gl_api::Gl};

/// Wrapper for a linked OpenGL program.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
pub struct Program {
    gl: Gl,
    /// The internal OpenGL id for this object. Never 0.
    id: GLuint,
}

impl Program {
    /// Link a vertex and a fragment stage into a program.
    ///
    /// The stages are detached again once linking succeeded, so the caller may
    /// drop them straight away.
    ///
    /// # Errors
    /// Errors if the stages are of the wrong kind, or if linking fails. Link
    /// errors carry the program info log.
    pub fn link(
        gl: &Gl,
        vert_shader: &CompiledShader,
        frag_shader: &CompiledShader,
    ) -> Result<Self, RenderError> {
        expect_stage(vert_shader, ShaderStage::Vertex)?;
        expect_stage(frag_shader, ShaderStage::Fragment)?;

        let id = gl.create_program();
        if id == 0 {
            return Err(RenderError::ProgramCreate);
        }
        // From here on `program` owns `id` and deletes it on every error path.
        let program = Self {
            gl: Gl::clone(gl),
            id,
        };

        gl.attach_shader(id, vert_shader.id());
        gl.attach_shader(id, frag_shader.id());
        gl.link_program(id);
        if !gl.program_link_status(id) {
            let log = gl.program_info_log(id);
            log::error!("Error linking program {id}\n{}", log.trim_end());
            return Err(RenderError::ProgramLink { log });
        }

        gl.detach_shader(id, vert_shader.id());
        gl.detach_shader(id, frag_shader.id());
        log::debug!("Linked program {id}");
        Ok(program)
    }

    /// Compile both stages from source and link them.
    ///
    /// # Errors
    /// See [`Shader::compile`] and [`Program::link`].
    pub fn from_sources(
        gl: &Gl,
        vert_source: &CStr,
        frag_source: &CStr,
    ) -> Result<Self, RenderError> {
        let vert_shader = Shader::vertex(gl, vert_source.to_owned())?.compile()?;
        let frag_shader = Shader::fragment(gl, frag_source.to_owned())?.compile()?;
        Self::link(gl, &vert_shader, &frag_shader)
    }

    /// Check that this program can run against the state `mesh` sets up.
    ///
    /// Core profile drivers validate against the current vertex array, so the
    /// mesh is bound for the duration of the check and unbound afterwards.
    ///
    /// # Errors
    /// Errors with the program info log if validation fails.
    pub fn validate(&self, mesh: &Mesh) -> Result<(), RenderError> {
        mesh.bind();
        self.gl.validate_program(self.id);
        let valid = self.gl.program_validate_status(self.id);
        mesh.unbind();

        if !valid {
            let log = self.gl.program_info_log(self.id);
            log::error!("Program {} failed validation\n{}", self.id, log.trim_end());
            return Err(RenderError::ProgramValidate { log });
        }
        log::debug!("Validated program {} against vao {}", self.id, mesh.vao());
        Ok(())
    }

    /// Get the internal id of this program.
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Get the location of a uniform in this program, or `None` if the
    /// program has no active uniform called `name`.
    ///
    /// # Errors
    /// Errors if `name` contains interior nuls.
    pub fn uniform_location(&self, name: &str) -> Result<Option<GLint>, RenderError> {
        let c_name = CString::new(name).map_err(|_| RenderError::InvalidCString {
            what: format!("uniform name {name:?}"),
        })?;
        let location = self.gl.uniform_location(self.id, &c_name);
        Ok(if location < 0 { None } else { Some(location) })
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

fn expect_stage(shader: &CompiledShader, expected: ShaderStage) -> Result<(), RenderError> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(RenderError::StageMismatch {
            expected,
            found: shader.stage(),
        })
    }
}
