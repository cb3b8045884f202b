use anyhow::Context;
use sdl_gl_demos::{run, scene::QuadScene, AppConfig};

fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let config = AppConfig::quad().with_args(std::env::args().skip(1));
    let scene = QuadScene::new(config.initial_offset, config.offset_step);
    run(&config, scene).context("quad demo failed")
}
