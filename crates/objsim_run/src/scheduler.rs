//! Fixed-timestep scheduler
//!
//! The host calls [`Scheduler::on_tick`] whenever it likes. The scheduler
//! compares the clock with the time of its last update and runs as many
//! fixed-length updates as fit, so late host ticks are caught up and early
//! ones do nothing.
//!
//! One update:
//! 1. increments the system's lifetime by the tick length
//! 2. runs the system's global behaviors
//! 3. runs the renderer pipeline over the system
//! 4. repeats 1-3 for every nested system, after the outer pass

use serde::{Serialize, Deserialize};
use objsim_core::traits::NestedSystem;
use objsim_core::{ActiveSystem, ComponentKind, Host, SimError, Vec3};
use crate::clock::{Clock, TickSource};
use crate::renderer::{RenderContext, RendererPipeline};

/// Scheduler settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Length of one update in milliseconds
    pub tick_ms: u64,
    /// Stop once no leaf entity is left anywhere in the system tree
    pub stop_when_empty: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            stop_when_empty: false,
        }
    }
}

/// Drives an active system tree at a fixed rate
pub struct Scheduler {
    config: SchedulerConfig,
    system: ActiveSystem,
    pipeline: RendererPipeline,
    clock: Box<dyn Clock>,
    tick_source: Option<Box<dyn TickSource>>,
    /// Clock time the last update accounts for; `None` until the first update
    last_update: Option<u64>,
    active: bool,
    updates: u64,
}

impl Scheduler {
    /// Create a stopped scheduler
    pub fn new(
        config: SchedulerConfig,
        system: ActiveSystem,
        pipeline: RendererPipeline,
        clock: impl Clock + 'static,
    ) -> Result<Self, SimError> {
        if config.tick_ms == 0 {
            return Err(SimError::argument("tick_ms must be positive"));
        }
        Ok(Self {
            config,
            system,
            pipeline,
            clock: Box::new(clock),
            tick_source: None,
            last_update: None,
            active: false,
            updates: 0,
        })
    }

    /// Register with `source` on start and unregister on stop
    pub fn with_tick_source(mut self, source: impl TickSource + 'static) -> Self {
        self.tick_source = Some(Box::new(source));
        self
    }

    // --- Lifecycle ---

    /// Start running; does nothing if already running
    ///
    /// The first update after a start always has `dt = 0`.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.last_update = None;
        if let Some(source) = self.tick_source.as_mut() {
            source.register(self.config.tick_ms);
        }
        log::info!(
            "Scheduler started: system {}, tick {} ms, {} renderers",
            self.system.id().get(),
            self.config.tick_ms,
            self.pipeline.len()
        );
    }

    /// Stop running; does nothing if already stopped
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(source) = self.tick_source.as_mut() {
            source.unregister();
        }
        log::info!(
            "Scheduler stopped: system {} after {} updates",
            self.system.id().get(),
            self.updates
        );
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    // --- Ticking ---

    /// Host tick callback: read the clock and catch up
    pub fn on_tick(&mut self, host: &mut dyn Host) -> Result<usize, SimError> {
        let now = self.clock.now_ms();
        self.poll(now, host)
    }

    /// Catch up to `now`, returning the number of updates run
    ///
    /// Errors raised during an update do not skip the rest of that update or
    /// the following ones; the first is returned at the end.
    pub fn poll(&mut self, now: u64, host: &mut dyn Host) -> Result<usize, SimError> {
        if !self.active {
            return Ok(0);
        }
        let period = self.config.tick_ms;
        let mut count = 0;
        let mut first_error = None;

        loop {
            let dt = match self.last_update {
                None => {
                    self.last_update = Some(now);
                    0
                }
                Some(last) if last.saturating_add(period) < now => {
                    self.last_update = Some(last + period);
                    period
                }
                Some(_) => break,
            };

            if let Err(e) = self.update(host, dt as f64) {
                first_error.get_or_insert(e);
            }
            count += 1;

            if self.config.stop_when_empty && self.system.is_exhausted() {
                log::info!("System {} is exhausted", self.system.id().get());
                self.stop();
                break;
            }
        }

        first_error.map_or(Ok(count), Err)
    }

    /// Run a single update of `dt` milliseconds, ignoring the clock
    pub fn update(&mut self, host: &mut dyn Host, dt: f64) -> Result<(), SimError> {
        self.updates += 1;
        let result = update_system(&mut self.system, &mut self.pipeline, host, dt, Vec3::ZERO);
        log::debug!(
            "Update {} (dt {} ms): {} entities",
            self.updates,
            dt,
            self.system.total_len()
        );
        result
    }

    // --- Accessors ---

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn system(&self) -> &ActiveSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ActiveSystem {
        &mut self.system
    }

    pub fn pipeline(&self) -> &RendererPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RendererPipeline {
        &mut self.pipeline
    }

    /// Updates run since creation
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Stop and hand back the system tree
    pub fn into_system(mut self) -> ActiveSystem {
        self.stop();
        self.system
    }
}

/// Advance `system` and, after it, every nested system
///
/// `parent_frame` is the absolute origin of the frame `system`'s origin is
/// expressed in.
fn update_system(
    system: &mut ActiveSystem,
    pipeline: &mut RendererPipeline,
    host: &mut dyn Host,
    dt: f64,
    parent_frame: Vec3,
) -> Result<(), SimError> {
    let mut first_error = None;
    let frame = parent_frame + system.origin();

    system.increment_lifetime(dt);
    if let Err(e) = system.run_behaviors(host, dt) {
        first_error.get_or_insert(e);
    }

    {
        let mut ctx = RenderContext::new(&mut *host, dt, frame);
        if let Err(e) = pipeline.run(&mut ctx, system) {
            first_error.get_or_insert(e);
        }
    }

    for key in system.keys_with(ComponentKind::of::<NestedSystem>()) {
        let Some(nested) = system.entity_mut(key).and_then(|e| e.get_mut::<NestedSystem>()) else {
            continue;
        };
        if let Err(e) = update_system(nested.system_mut(), pipeline, host, dt, frame) {
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}
