//! Startup sequence and main loop shared by both demos.
use std::time::{Duration, Instant};

use crate::{
    config::AppConfig,
    error::RenderError,
    geometry::Mesh,
    gl_api::Gl,
    gl_wrappers::Program,
    platform::Platform,
    renderer::{FrameRenderer, FrameReport, Present},
    scene::{FrameInput, Scene},
    shader_source::load_shader_source,
};

/// Whether the loop should keep going after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue(FrameReport),
    Exit,
}

/// Collects frame times and logs the average once a second.
pub struct FrameTimer {
    frametime_collector: Vec<f64>,
    last_debug_check: Instant,
    frame_start: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frametime_collector: Vec::with_capacity(120),
            last_debug_check: now,
            frame_start: now,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Record the frame started by [`begin_frame`](Self::begin_frame).
    /// Returns the average frame time if a report was due.
    pub fn end_frame(&mut self) -> Option<f64> {
        let now = Instant::now();
        self.frametime_collector
            .push(now.duration_since(self.frame_start).as_secs_f64());

        // If it's been over a second since last debug print, print it
        if now.duration_since(self.last_debug_check) < Duration::from_secs(1) {
            return None;
        }
        let total_time: f64 = self.frametime_collector.iter().sum();
        let avg_time = total_time / self.frametime_collector.len() as f64;
        log::debug!(
            "frametime: {avg_time:0.8}, FPS: {:0.2}, frames counted: {:05}",
            1. / avg_time,
            self.frametime_collector.len()
        );
        self.frametime_collector.clear();
        self.last_debug_check = now;
        Some(avg_time)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// A scene with its program, geometry and renderer, ready to draw.
///
/// Must be dropped before the context `gl` belongs to.
pub struct App<S: Scene> {
    scene: S,
    renderer: FrameRenderer,
    // GL objects are released in declaration order.
    mesh: Mesh,
    program: Program,
    aspect: f32,
    frames: u64,
}

impl<S: Scene> App<S> {
    /// Upload the scene geometry, then load, compile and link its shaders and
    /// validate the program against that geometry.
    ///
    /// # Errors
    /// Any failure here is a startup failure; nothing is partially kept.
    pub fn new(gl: &Gl, config: &AppConfig, scene: S) -> Result<Self, RenderError> {
        let mesh = scene.upload(gl)?;
        let vert_source = load_shader_source(&config.vertex_shader)?;
        let frag_source = load_shader_source(&config.fragment_shader)?;
        let program = Program::from_sources(gl, &vert_source, &frag_source)?;
        program.validate(&mesh)?;
        log::info!(
            "Scene '{}' ready: program {}, {} vertices",
            scene.name(),
            program.id(),
            mesh.vertex_count()
        );

        let renderer = FrameRenderer::new(
            gl,
            (config.width, config.height),
            config.clear_color,
            config.missing_uniform,
        );
        Ok(Self {
            scene,
            renderer,
            mesh,
            program,
            aspect: config.aspect(),
            frames: 0,
        })
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one iteration of the loop. A quit request is honoured before
    /// anything is drawn.
    ///
    /// # Errors
    /// Propagates the renderer's error; see [`FrameRenderer::render_frame`].
    pub fn frame(
        &mut self,
        input: &FrameInput,
        target: &mut impl Present,
    ) -> Result<LoopControl, RenderError> {
        if input.quit {
            return Ok(LoopControl::Exit);
        }
        self.scene.update(input);
        let uniforms = self.scene.uniforms(self.aspect);
        let report = self
            .renderer
            .render_frame(&self.program, &self.mesh, &uniforms, target)?;
        self.frames += 1;
        Ok(LoopControl::Continue(report))
    }
}

/// Open the window, build `scene` and render it until the window is closed.
///
/// Every resource is released before this returns, on success and on error.
///
/// # Errors
/// Setup, shader and per-frame failures, as [`RenderError`].
pub fn run<S: Scene>(config: &AppConfig, scene: S) -> Result<(), RenderError> {
    let mut platform = Platform::init(config)?;
    let (width, height) = platform.drawable_size();
    if (width, height) != (config.width, config.height) {
        log::debug!("Drawable size {width}x{height} differs from window size");
    }
    let mut app = App::new(&platform.gl(), config, scene)?;
    let mut timer = FrameTimer::new();

    loop {
        timer.begin_frame();
        let input = platform.poll_input();
        match app.frame(&input, &mut platform)? {
            LoopControl::Exit => break,
            LoopControl::Continue(_) => {}
        }
        timer.end_frame();
    }
    log::info!("Closed progrum after {} frames", app.frames());
    Ok(())
}
