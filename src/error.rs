//! Exports [`RenderError`], the error type shared by every stage of the pipeline.
use std::{fmt, io, path::PathBuf};

use crate::gl_wrappers::ShaderStage;

/// The part of startup that failed before any GL object existed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStage {
    /// SDL itself or its video subsystem.
    Subsystem,
    /// Creating the window.
    Window,
    /// Creating or activating the OpenGL context.
    Context,
    /// Resolving OpenGL function pointers.
    Loader,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetupStage::Subsystem => "video subsystem",
            SetupStage::Window => "window",
            SetupStage::Context => "OpenGL context",
            SetupStage::Loader => "OpenGL loader",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum RenderError {
    /// Platform setup failed. `message` is whatever SDL reported.
    Setup { stage: SetupStage, message: String },
    /// A shader source file could not be read.
    ShaderSource { path: PathBuf, source: io::Error },
    /// A string handed to OpenGL contained an interior NUL.
    InvalidCString { what: String },
    /// OpenGL returned 0 from `glCreateShader`.
    ShaderCreate(ShaderStage),
    /// Compilation failed; `log` is the driver's info log.
    ShaderCompile { stage: ShaderStage, log: String },
    /// A program was assembled from the wrong kinds of stages.
    StageMismatch {
        expected: ShaderStage,
        found: ShaderStage,
    },
    /// OpenGL returned 0 from `glCreateProgram`.
    ProgramCreate,
    ProgramLink { log: String },
    ProgramValidate { log: String },
    /// Vertex data does not line up with the declared attribute layout.
    LayoutMismatch { stride: usize, byte_len: usize },
    /// An index addresses a vertex past the end of the vertex buffer.
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// OpenGL returned 0 when allocating a buffer or vertex array.
    BufferCreate,
    /// The linked program does not declare a uniform the scene pushes.
    MissingUniform { name: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Setup { stage, message } => {
                write!(f, "Failed to initialize {stage}: {message}")
            }
            RenderError::ShaderSource { path, source } => {
                write!(f, "Cannot read shader '{}': {source}", path.display())
            }
            RenderError::InvalidCString { what } => {
                write!(f, "{what} contains an interior NUL byte")
            }
            RenderError::ShaderCreate(stage) => write!(f, "Could not create {stage} shader object"),
            RenderError::ShaderCompile { stage, log } => {
                write!(f, "{stage} shader did not compile. OpenGL reply: '{log}'")
            }
            RenderError::StageMismatch { expected, found } => {
                write!(f, "Expected a {expected} shader, got a {found} shader")
            }
            RenderError::ProgramCreate => f.write_str("Could not create program object"),
            RenderError::ProgramLink { log } => {
                write!(f, "Error linking program. OpenGL reply: '{log}'")
            }
            RenderError::ProgramValidate { log } => {
                write!(f, "Program failed validation. OpenGL reply: '{log}'")
            }
            RenderError::LayoutMismatch { stride, byte_len } => write!(
                f,
                "Vertex data of {byte_len} bytes is not a non-empty multiple of the {stride} byte stride"
            ),
            RenderError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "Index {index} is out of range for {vertex_count} vertices"
            ),
            RenderError::BufferCreate => f.write_str("Failed to create buffer object"),
            RenderError::MissingUniform { name } => {
                write!(f, "Uniform '{name}' is not declared by the active program")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ShaderSource { source, .. } => Some(source),
            _ => None,
        }
    }
}
