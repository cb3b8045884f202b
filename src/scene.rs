//! The two demo scenes: a plain triangle and an indexed, coloured quad.
use crate::{
    error::RenderError,
    geometry::Mesh,
    gl_api::Gl,
    render_vec::{ColorVertex, PositionVertex},
    renderer::Uniform,
};

pub const MODEL_MATRIX_UNIFORM: &str = "u_ModelMatrix";
pub const PROJECTION_UNIFORM: &str = "u_Perspective";

/// One pass over the event queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// The window was asked to close.
    pub quit: bool,
    /// Up arrow held.
    pub up: bool,
    /// Down arrow held.
    pub down: bool,
}

pub trait Scene {
    fn name(&self) -> &'static str;
    /// Build the GPU geometry. Called once at startup.
    fn upload(&self, gl: &Gl) -> Result<Mesh, RenderError>;
    /// Advance per-frame state from input.
    fn update(&mut self, input: &FrameInput);
    /// Uniforms to push this frame, for a viewport of the given aspect ratio.
    fn uniforms(&self, aspect: f32) -> Vec<Uniform>;
}

pub const TRIANGLE_VERTICES: [PositionVertex; 3] = [
    PositionVertex {
        position: [-0.8, -0.8, 0.0],
    },
    PositionVertex {
        position: [0.8, -0.8, 0.0],
    },
    PositionVertex {
        position: [0.0, 0.8, 0.0],
    },
];

#[derive(Debug, Default)]
pub struct TriangleScene;

impl Scene for TriangleScene {
    fn name(&self) -> &'static str {
        "triangle"
    }
    fn upload(&self, gl: &Gl) -> Result<Mesh, RenderError> {
        Mesh::upload(gl, &TRIANGLE_VERTICES, None)
    }
    fn update(&mut self, _input: &FrameInput) {}
    fn uniforms(&self, _aspect: f32) -> Vec<Uniform> {
        Vec::new()
    }
}

pub const QUAD_VERTICES: [ColorVertex; 4] = [
    // bottom left
    ColorVertex {
        position: [-0.5, -0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    // bottom right
    ColorVertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    // top left
    ColorVertex {
        position: [-0.5, 0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
    // top right
    ColorVertex {
        position: [0.5, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
];

/// Two counter-clockwise triangles sharing the 2-1 diagonal.
pub const QUAD_INDICES: [u32; 6] = [2, 0, 1, 3, 2, 1];

/// Vertical field of view, in degrees.
pub const QUAD_FOV_DEGREES: f32 = 45.0;
pub const QUAD_NEAR: f32 = 0.1;
pub const QUAD_FAR: f32 = 10.0;

/// The quad slides along Z while Up or Down is held.
#[derive(Debug)]
pub struct QuadScene {
    offset: f32,
    step: f32,
}

impl QuadScene {
    pub fn new(initial_offset: f32, step: f32) -> Self {
        Self {
            offset: initial_offset,
            step,
        }
    }
    pub fn offset(&self) -> f32 {
        self.offset
    }
    pub fn model_matrix(&self) -> glm::Mat4 {
        glm::translate(&glm::Mat4::identity(), &glm::vec3(0.0, 0.0, self.offset))
    }
    pub fn projection_matrix(aspect: f32) -> glm::Mat4 {
        glm::perspective(aspect, QUAD_FOV_DEGREES.to_radians(), QUAD_NEAR, QUAD_FAR)
    }
}

impl Scene for QuadScene {
    fn name(&self) -> &'static str {
        "quad"
    }
    fn upload(&self, gl: &Gl) -> Result<Mesh, RenderError> {
        Mesh::upload(gl, &QUAD_VERTICES, Some(&QUAD_INDICES))
    }
    fn update(&mut self, input: &FrameInput) {
        if input.up {
            self.offset += self.step;
        }
        if input.down {
            self.offset -= self.step;
        }
    }
    fn uniforms(&self, aspect: f32) -> Vec<Uniform> {
        vec![
            Uniform::mat4(MODEL_MATRIX_UNIFORM, self.model_matrix()),
            Uniform::mat4(PROJECTION_UNIFORM, Self::projection_matrix(aspect)),
        ]
    }
}
