//! Gold Arena headless demo
//!
//! Generates a level from a seed, runs a random policy through the engine,
//! builds one training batch and prints the level as JSON.
//!
//! Usage: `gold-arena [seed] [steps]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345_u64);
    let steps = args.next().and_then(|s| s.parse().ok()).unwrap_or(500_usize);

    if let Err(e) = run(seed, steps) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; embedders drive the engine directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run(seed: u64, steps: usize) -> Result<(), Box<dyn std::error::Error>> {
    use gold_arena::observation::ObservationSampler;
    use gold_arena::renderer::SoftwareCanvas;
    use gold_arena::sim::generate_level;
    use gold_arena::{BatchConfig, DisplayMode, Engine, EngineSettings, GeneratorConfig};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    log::info!("Gold Arena (headless) seed={} steps={}", seed, steps);
    let mut rng = Pcg32::seed_from_u64(seed);

    let config = GeneratorConfig {
        canvas_resolution: 128,
        ..Default::default()
    };
    let level = generate_level(&config, &mut rng)?;
    println!("{}", level.to_json()?);

    let mut engine = Engine::new(
        level,
        SoftwareCanvas::new(config.canvas_resolution),
        DisplayMode::Machine,
        EngineSettings::default(),
    )?;
    engine.reset();

    let actions = engine.action_space().len();
    for _ in 0..steps {
        let outcome = engine.step(rng.random_range(0..actions))?;
        if outcome.reward_delta > 0 {
            log::info!("Reward {} (total {})", outcome.reward_delta, outcome.info.total_reward);
        }
    }
    let world = engine.world();
    log::info!(
        "Finished: reward {}, {} gold left, agent at ({:.3}, {:.3})",
        world.reward,
        world.gold.len(),
        world.agent.pos.x,
        world.agent.pos.y
    );

    let mut sampler = ObservationSampler::new(SoftwareCanvas::new(64), 64, BatchConfig::default())?;
    let batch = sampler.build_training_batch(engine.world(), &mut rng)?;
    log::info!(
        "Training batch: {} images of {:?}",
        batch.len(),
        batch.images.first().map(|image| image.shape())
    );
    Ok(())
}
