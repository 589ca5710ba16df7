//! Renderer pipeline
//!
//! A renderer is a per-entity pass over an active system. The pipeline runs
//! its renderers one after another in priority order; each renderer sees a
//! fresh snapshot of the system's entity keys, so entities spawned by an
//! earlier renderer are visited by later ones and entities removed earlier
//! are skipped.

use objsim_core::{ActiveSystem, ComponentKind, EntityKey, Host, SimError, Vec3};

/// What a renderer gets besides the entity it runs on
pub struct RenderContext<'a> {
    pub host: &'a mut dyn Host,
    /// Tick length in milliseconds
    pub dt: f64,
    /// Absolute origin of the system being rendered
    pub frame: Vec3,
}

impl<'a> RenderContext<'a> {
    pub fn new(host: &'a mut dyn Host, dt: f64, frame: Vec3) -> Self {
        Self { host, dt, frame }
    }

    /// Convert a system-relative position to world coordinates
    #[inline]
    pub fn to_world(&self, position: Vec3) -> Vec3 {
        self.frame + position
    }
}

/// Per-entity pass run once per tick
pub trait Renderer {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Lower runs first; ties keep insertion order
    fn priority(&self) -> i32;

    /// Only entities satisfying this kind are visited; `None` visits all
    fn object_kind(&self) -> Option<ComponentKind> {
        None
    }

    fn render(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
        key: EntityKey,
    ) -> Result<(), SimError>;
}

/// Ordered list of renderers
#[derive(Default)]
pub struct RendererPipeline {
    renderers: Vec<Box<dyn Renderer>>,
}

impl RendererPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a renderer after every renderer of lower or equal priority
    pub fn add(&mut self, renderer: Box<dyn Renderer>) {
        let priority = renderer.priority();
        let index = self
            .renderers
            .iter()
            .position(|r| r.priority() > priority)
            .unwrap_or(self.renderers.len());
        self.renderers.insert(index, renderer);
    }

    /// Builder form of [`RendererPipeline::add`]
    pub fn with(mut self, renderer: impl Renderer + 'static) -> Self {
        self.add(Box::new(renderer));
        self
    }

    /// Number of renderers
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Renderer names in run order
    pub fn names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Run every renderer over `system`
    ///
    /// A failing renderer does not stop the pass. Every failure is logged and
    /// the first one is returned once all renderers have run.
    pub fn run(
        &mut self,
        ctx: &mut RenderContext<'_>,
        system: &mut ActiveSystem,
    ) -> Result<(), SimError> {
        let mut first_error = None;

        for renderer in self.renderers.iter_mut() {
            let keys = match renderer.object_kind() {
                Some(kind) => system.keys_with(kind),
                None => system.keys(),
            };
            for key in keys {
                if !system.contains(key) {
                    continue;
                }
                if let Err(e) = renderer.render(ctx, system, key) {
                    log::error!("Renderer '{}' failed on {:?}: {}", renderer.name(), key, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for RendererPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
