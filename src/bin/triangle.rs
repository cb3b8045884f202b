use anyhow::Context;
use sdl_gl_demos::{run, scene::TriangleScene, AppConfig};

fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let config = AppConfig::triangle().with_args(std::env::args().skip(1));
    run(&config, TriangleScene).context("triangle demo failed")
}
