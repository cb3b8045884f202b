//! Two minimal SDL2 + OpenGL demos: a triangle and an indexed, coloured quad.
//!
//! Startup reads and links a vertex/fragment shader pair, uploads a fixed set
//! of vertices once, and then renders one primitive per frame until the
//! window is closed. Every GL object is owned by a wrapper that releases it
//! on drop, and all OpenGL access goes through an explicit [`gl_api::Gl`]
//! handle.
pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gl_api;
pub mod gl_wrappers;
pub mod platform;
pub mod render_vec;
pub mod renderer;
pub mod scene;
pub mod shader_source;

pub use gl;
pub use glm;
pub use sdl2;

pub use app::{run, App, LoopControl};
pub use config::AppConfig;
pub use error::{RenderError, SetupStage};
pub use gl_api::Gl;
