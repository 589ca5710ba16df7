use crate::component::Component;
use crate::system::ActiveSystem;

/// An active system carried by an entity
///
/// The inner system's origin is relative to the frame of the system holding
/// the carrier, and its entities are relative to the inner origin. The
/// scheduler advances it after the outer system's own pass.
#[derive(Debug)]
pub struct NestedSystem {
    system: ActiveSystem,
}

impl NestedSystem {
    pub fn new(system: ActiveSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &ActiveSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ActiveSystem {
        &mut self.system
    }

    pub fn into_inner(self) -> ActiveSystem {
        self.system
    }
}

impl Component for NestedSystem {}
