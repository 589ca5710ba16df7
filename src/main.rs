//! objsim - headless simulation runner
//!
//! Runs the fountain demo against a host that only logs what it would have
//! displayed.

use std::time::{Duration, Instant};
use objsim::config::SimConfig;
use objsim::demo;
use objsim_core::{DirtyFlags, FireworkEffect, Host, ParticleEffect, Vec3};
use objsim_run::{MonotonicClock, Scheduler};

/// Host that counts and logs effect requests
#[derive(Default)]
struct LoggingHost {
    particles: u64,
    fireworks: u64,
}

impl Host for LoggingHost {
    fn spawn_particle(&mut self, effect: &ParticleEffect, position: Vec3) {
        self.particles += 1;
        log::trace!("particle '{}' x{} at {:?}", effect.name, effect.count, position);
    }

    fn spawn_firework(&mut self, effect: &FireworkEffect, position: Vec3) {
        self.fireworks += 1;
        log::debug!("firework {:?} at {:?}", effect.burst, position);
    }
}

fn main() {
    let config = SimConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        SimConfig::default()
    });

    // Initialize logging; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.debug.log_level),
    )
    .init();
    log::info!("Starting objsim");

    let system = match demo::build_fountain(&config.demo) {
        Ok(system) => system,
        Err(e) => {
            log::error!("Failed to build demo: {}", e);
            std::process::exit(1);
        }
    };

    let mut scheduler = match Scheduler::new(
        config.scheduler_config(),
        system,
        config.pipeline(),
        MonotonicClock::new(),
    ) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            log::error!("Failed to create scheduler: {}", e);
            std::process::exit(1);
        }
    };

    let mut host = LoggingHost::default();
    let started = Instant::now();
    let deadline = Duration::from_millis(config.demo.duration_ms);
    let pause = Duration::from_millis((config.scheduler.tick_ms / 2).max(1));

    scheduler.start();
    while scheduler.is_active() && started.elapsed() < deadline {
        match scheduler.on_tick(&mut host) {
            Ok(0) => {}
            Ok(_) => {
                let changed = scheduler.system_mut().take_dirty();
                let moved = changed.iter().filter(|(_, f)| f.contains(DirtyFlags::MOTION)).count();
                log::debug!("{} entities changed, {} moved", changed.len(), moved);
            }
            Err(e) => log::warn!("Tick reported an error: {}", e),
        }
        std::thread::sleep(pause);
    }
    scheduler.stop();

    log::info!(
        "Finished after {} updates: {} particles, {} fireworks, {} entities left",
        scheduler.updates(),
        host.particles,
        host.fireworks,
        scheduler.system().total_len()
    );
}
