use std::process;

use glprimer::engine::renderer::Renderer;
use glprimer::engine::scene::RenderContext;
use glprimer::{Config, EngineError};
use log::error;

fn start(config: &Config) -> Result<(Renderer, RenderContext), EngineError> {
    let renderer = Renderer::new(config)?;
    let scene = RenderContext::load(config)?;
    Ok((renderer, scene))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    match start(&config) {
        // Blocks until the window closes.
        Ok((renderer, scene)) => renderer.run(scene),
        Err(e) => {
            error!("{e}. Terminating.");
            process::exit(1);
        }
    }
}
