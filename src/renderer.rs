//! Per-frame rendering: one fixed sequence of stages ending in a buffer swap.
use std::collections::HashMap;

use gl::types::{GLint, GLuint};

use crate::{
    error::RenderError,
    geometry::Mesh,
    gl_api::{Capability, Gl, Primitive},
    gl_wrappers::{gl_upd_viewport, Program},
};

/// The stages of a frame, in the only order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    Clear,
    SelectProgram,
    BindGeometry,
    PushUniforms,
    IssueDraw,
    DeselectProgram,
    Present,
}

/// Something that can show the finished frame.
pub trait Present {
    fn present(&mut self);
}

/// What to do when a program lacks a uniform the scene pushes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingUniformPolicy {
    /// Abort the frame with [`RenderError::MissingUniform`].
    #[default]
    Fatal,
    /// Log once, then silently skip the upload on every later frame.
    WarnOnce,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Mat4(glm::Mat4),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Uniform {
    pub name: &'static str,
    pub value: UniformValue,
}

impl Uniform {
    pub fn mat4(name: &'static str, value: glm::Mat4) -> Self {
        Self {
            name,
            value: UniformValue::Mat4(value),
        }
    }
}

/// The draw call a frame issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub primitive: Primitive,
    /// Vertices for array draws, indices for indexed draws.
    pub count: usize,
    pub indexed: bool,
    /// Uniforms actually uploaded.
    pub uniforms_pushed: usize,
}

/// Uniform locations of one program by name. `None` is the cached "missing"
/// sentinel.
///
/// Emptied whenever a different program id comes in. GL reuses the names of
/// deleted programs, so a program replaced under the same id is not noticed.
#[derive(Default)]
struct UniformCache {
    program: Option<GLuint>,
    locations: HashMap<&'static str, Option<GLint>>,
}

impl UniformCache {
    /// Returns the location and whether this lookup was the first one.
    fn resolve(
        &mut self,
        program: &Program,
        name: &'static str,
    ) -> Result<(Option<GLint>, bool), RenderError> {
        if self.program != Some(program.id()) {
            self.locations.clear();
            self.program = Some(program.id());
        }
        if let Some(&location) = self.locations.get(name) {
            return Ok((location, false));
        }
        let location = program.uniform_location(name)?;
        self.locations.insert(name, location);
        Ok((location, true))
    }
}

pub struct FrameRenderer {
    gl: Gl,
    clear_color: [f32; 4],
    viewport: (u32, u32),
    policy: MissingUniformPolicy,
    uniforms: UniformCache,
}

impl FrameRenderer {
    pub fn new(
        gl: &Gl,
        viewport: (u32, u32),
        clear_color: [f32; 4],
        policy: MissingUniformPolicy,
    ) -> Self {
        Self {
            gl: Gl::clone(gl),
            clear_color,
            viewport,
            policy,
            uniforms: UniformCache::default(),
        }
    }

    fn enter(&self, stage: FrameStage) {
        log::trace!("frame stage {stage:?}");
    }

    /// Run every stage of one frame and present it.
    ///
    /// # Errors
    /// Errors with [`RenderError::MissingUniform`] under
    /// [`MissingUniformPolicy::Fatal`]. The program and geometry are unbound
    /// and nothing is presented in that case.
    pub fn render_frame(
        &mut self,
        program: &Program,
        mesh: &Mesh,
        uniforms: &[Uniform],
        target: &mut impl Present,
    ) -> Result<FrameReport, RenderError> {
        self.enter(FrameStage::Clear);
        self.gl.set_capability(Capability::DepthTest, false);
        self.gl.set_capability(Capability::CullFace, false);
        gl_upd_viewport(&self.gl, self.viewport.0, self.viewport.1);
        self.gl.clear(self.clear_color);

        self.enter(FrameStage::SelectProgram);
        self.gl.use_program(program.id());

        self.enter(FrameStage::BindGeometry);
        mesh.bind();

        self.enter(FrameStage::PushUniforms);
        let uniforms_pushed = match self.push_uniforms(program, uniforms) {
            Ok(n) => n,
            Err(err) => {
                mesh.unbind();
                self.gl.use_program(0);
                return Err(err);
            }
        };

        self.enter(FrameStage::IssueDraw);
        mesh.draw();

        self.enter(FrameStage::DeselectProgram);
        mesh.unbind();
        self.gl.use_program(0);

        self.enter(FrameStage::Present);
        target.present();

        Ok(FrameReport {
            primitive: mesh.primitive(),
            count: if mesh.is_indexed() {
                mesh.index_count()
            } else {
                mesh.vertex_count()
            },
            indexed: mesh.is_indexed(),
            uniforms_pushed,
        })
    }

    fn push_uniforms(
        &mut self,
        program: &Program,
        uniforms: &[Uniform],
    ) -> Result<usize, RenderError> {
        let mut pushed = 0;
        for uniform in uniforms {
            let (location, first_lookup) = self.uniforms.resolve(program, uniform.name)?;
            let Some(location) = location else {
                match self.policy {
                    MissingUniformPolicy::Fatal => {
                        log::error!(
                            "Uniform '{}' not found in program {}",
                            uniform.name,
                            program.id()
                        );
                        return Err(RenderError::MissingUniform {
                            name: uniform.name.to_owned(),
                        });
                    }
                    MissingUniformPolicy::WarnOnce => {
                        if first_lookup {
                            log::warn!(
                                "Uniform '{}' not found in program {}, skipping it from now on",
                                uniform.name,
                                program.id()
                            );
                        }
                        continue;
                    }
                }
            };
            match &uniform.value {
                UniformValue::Mat4(matrix) => {
                    let mut columns = [0.0f32; 16];
                    columns.copy_from_slice(matrix.as_slice());
                    self.gl.uniform_matrix4(location, &columns);
                }
            }
            pushed += 1;
        }
        Ok(pushed)
    }
}
