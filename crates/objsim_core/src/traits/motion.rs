use objsim_math::Vec3;
use crate::component::{Component, ComponentKind, Physical};
use crate::host::ExternalEntity;

/// Position and velocity owned by the simulation
///
/// Position is relative to the owning system's origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    pub position: Vec3,
    /// Blocks per second
    pub velocity: Vec3,
}

impl Motion {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }

    /// At rest at `position`
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

impl Physical for Motion {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}

impl Component for Motion {
    fn provides(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<dyn Physical>()]
    }

    fn as_physical(&self) -> Option<&(dyn Physical + 'static)> {
        Some(self)
    }

    fn as_physical_mut(&mut self) -> Option<&mut (dyn Physical + 'static)> {
        Some(self)
    }
}

/// Position and velocity delegated to an entity owned by the host
///
/// The host works in absolute coordinates; `frame` is the absolute origin of
/// the system holding this component and is used to convert both ways.
pub struct Delegate {
    handle: Box<dyn ExternalEntity>,
    frame: Vec3,
}

impl Delegate {
    pub fn new(handle: impl ExternalEntity + 'static, frame: Vec3) -> Self {
        Self {
            handle: Box::new(handle),
            frame,
        }
    }

    /// The host entity
    pub fn handle(&self) -> &dyn ExternalEntity {
        &*self.handle
    }

    pub fn handle_mut(&mut self) -> &mut dyn ExternalEntity {
        &mut *self.handle
    }

    /// Absolute origin used for coordinate conversion
    pub fn frame(&self) -> Vec3 {
        self.frame
    }

    /// Move to another reference frame, keeping the absolute position
    pub fn set_frame(&mut self, frame: Vec3) {
        self.frame = frame;
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }
}

impl Physical for Delegate {
    fn position(&self) -> Vec3 {
        self.handle.position() - self.frame
    }

    fn set_position(&mut self, position: Vec3) {
        self.handle.set_position(position + self.frame);
    }

    fn velocity(&self) -> Vec3 {
        self.handle.velocity()
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.handle.set_velocity(velocity);
    }
}

impl Component for Delegate {
    fn provides(&self) -> Vec<ComponentKind> {
        vec![ComponentKind::of::<dyn Physical>()]
    }

    fn as_physical(&self) -> Option<&(dyn Physical + 'static)> {
        Some(self)
    }

    fn as_physical_mut(&mut self) -> Option<&mut (dyn Physical + 'static)> {
        Some(self)
    }
}

impl std::fmt::Debug for Delegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("position", &self.handle.position())
            .field("frame", &self.frame)
            .field("valid", &self.handle.is_valid())
            .finish()
    }
}
