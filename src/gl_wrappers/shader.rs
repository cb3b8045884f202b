//! Exports [`Shader`] and [`CompiledShader`].
use std::{ffi::CString, fmt};

use gl::types::{GLenum, GLuint};

use crate::{error::RenderError, gl_api::Gl};

/// An uncompiled OpenGL shader.
/// Contains the source code necessary to compile it.
pub struct Shader {
    gl: Gl,
    /// GL ID for this shader.
    inner: GLuint,
    stage: ShaderStage,
    /// The source code for this shader.
    source: CString,
    /// Ownership of `inner` moved into a [`CompiledShader`].
    was_compiled: bool,
}

/// Represents the type of a shader object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// This shader is a Vertex shader.
    Vertex,
    /// This shader is a Fragment shader.
    Fragment,
}

impl ShaderStage {
    pub const fn as_gl(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

impl Shader {
    /// Wrap shader source code into a type-safe Rust struct.
    ///
    /// # Errors
    /// Errors if OpenGL refuses to create the shader object.
    pub fn new(
        gl: &Gl,
        stage: ShaderStage,
        source: impl Into<CString>,
    ) -> Result<Self, RenderError> {
        let inner = gl.create_shader(stage);
        if inner == 0 {
            return Err(RenderError::ShaderCreate(stage));
        }
        Ok(Self {
            gl: Gl::clone(gl),
            inner,
            stage,
            source: source.into(),
            was_compiled: false,
        })
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex(gl: &Gl, source: CString) -> Result<Self, RenderError> {
        Self::new(gl, ShaderStage::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment(gl: &Gl, source: CString) -> Result<Self, RenderError> {
        Self::new(gl, ShaderStage::Fragment, source)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Compile this shader.
    ///
    /// Returns a [`CompiledShader`], for use in [`Program`](super::Program)s.
    /// On failure the driver's log is written to the error log, the shader
    /// object is deleted, and nothing usable is returned.
    ///
    /// # Errors
    /// Errors if compilation was unsuccessful, with the response from OpenGL.
    pub fn compile(mut self) -> Result<CompiledShader, RenderError> {
        self.gl.shader_source(self.inner, &self.source);
        self.gl.compile_shader(self.inner);

        if !self.gl.shader_compile_status(self.inner) {
            let log = self.gl.shader_info_log(self.inner);
            log::error!(
                "{} shader compilation failed\n{}",
                self.stage,
                log.trim_end()
            );
            // `self` drops here and deletes the object.
            return Err(RenderError::ShaderCompile {
                stage: self.stage,
                log,
            });
        }
        self.was_compiled = true;
        log::debug!("Compiled {} shader {}", self.stage, self.inner);
        Ok(CompiledShader {
            gl: Gl::clone(&self.gl),
            id: self.inner,
            stage: self.stage,
        })
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if !self.was_compiled {
            self.gl.delete_shader(self.inner);
        }
    }
}

/// A compiled shader object.
/// This can be linked and used in [`Program`](super::Program)s.
pub struct CompiledShader {
    gl: Gl,
    /// GL ID for this compiled shader. Never 0.
    id: GLuint,
    stage: ShaderStage,
}

impl CompiledShader {
    /// Get the internal GL ID of this shader.
    pub fn id(&self) -> GLuint {
        self.id
    }
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}
