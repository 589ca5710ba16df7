//! Component model
//!
//! A component is a typed data fragment attached to an [`Entity`](crate::Entity).
//! Instead of runtime annotations, each component type answers three questions
//! in plain code:
//!
//! - [`Component::kind`] - which concrete kind it is
//! - [`Component::provides`] - which extra kinds (capabilities) it can stand in for
//! - [`Component::requires`] - which kinds must also be present on its entity
//!
//! A component *satisfies* a kind when it is that kind or provides it. This is
//! the only notion of "subtype" the engine uses.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use objsim_math::Vec3;

/// Identifier of a component type or capability
///
/// Built from a [`TypeId`], so `ComponentKind::of::<dyn Physical>()` names the
/// physics capability and `ComponentKind::of::<Motion>()` a concrete component.
#[derive(Clone, Copy)]
pub struct ComponentKind {
    id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    /// Kind of the type `T` (concrete component or `dyn` capability)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without the module path
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentKind {}

impl Hash for ComponentKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.short_name())
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type
///
/// Implemented for every `'static` type. Call it on `&dyn Component`, never on
/// a `&Box<dyn Component>`: the box itself is `Any` too and would downcast to
/// nothing.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A data fragment attachable to an entity
pub trait Component: AsAny {
    /// Concrete kind of this component
    fn kind(&self) -> ComponentKind {
        ComponentKind::of::<Self>()
    }

    /// Additional kinds this component can stand in for
    fn provides(&self) -> Vec<ComponentKind> {
        Vec::new()
    }

    /// Kinds that must be satisfied by some component on the same entity
    fn requires(&self) -> Vec<ComponentKind> {
        Vec::new()
    }

    /// Physics view, for components that provide `dyn Physical`
    fn as_physical(&self) -> Option<&(dyn Physical + 'static)> {
        None
    }

    /// Mutable physics view, for components that provide `dyn Physical`
    fn as_physical_mut(&mut self) -> Option<&mut (dyn Physical + 'static)> {
        None
    }

    /// Whether this component is `kind` or provides it
    fn satisfies(&self, kind: ComponentKind) -> bool {
        self.kind() == kind || self.provides().contains(&kind)
    }
}

/// Capability of anything with a position and velocity
///
/// Positions are relative to the origin of the owning active system, velocities
/// are in blocks per second.
pub trait Physical {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Current speed in blocks per second
    fn speed(&self) -> f64 {
        self.velocity().length()
    }
}

/// Typed lookup of a component or capability on an entity
///
/// Implemented for every concrete [`Component`] (downcast) and for
/// `dyn Physical` (capability view).
pub trait Query: 'static {
    /// Kind used for filtering and dependency checks
    fn query_kind() -> ComponentKind;
    fn view(component: &dyn Component) -> Option<&Self>;
    fn view_mut(component: &mut dyn Component) -> Option<&mut Self>;
}

impl<T: Component> Query for T {
    fn query_kind() -> ComponentKind {
        ComponentKind::of::<T>()
    }

    fn view(component: &dyn Component) -> Option<&Self> {
        component.as_any().downcast_ref::<T>()
    }

    fn view_mut(component: &mut dyn Component) -> Option<&mut Self> {
        component.as_any_mut().downcast_mut::<T>()
    }
}

impl Query for dyn Physical {
    fn query_kind() -> ComponentKind {
        ComponentKind::of::<dyn Physical>()
    }

    fn view(component: &dyn Component) -> Option<&Self> {
        component.as_physical()
    }

    fn view_mut(component: &mut dyn Component) -> Option<&mut Self> {
        component.as_physical_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;
    impl Component for Tag {}

    struct Body {
        position: Vec3,
        velocity: Vec3,
    }

    impl Physical for Body {
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

    impl Component for Body {
        fn provides(&self) -> Vec<ComponentKind> {
            vec![ComponentKind::of::<dyn Physical>()]
        }
        fn requires(&self) -> Vec<ComponentKind> {
            vec![ComponentKind::of::<Tag>()]
        }
        fn as_physical(&self) -> Option<&(dyn Physical + 'static)> {
            Some(self)
        }
        fn as_physical_mut(&mut self) -> Option<&mut (dyn Physical + 'static)> {
            Some(self)
        }
    }

    fn body() -> Body {
        Body {
            position: Vec3::ZERO,
            velocity: Vec3::new(3.0, 4.0, 0.0),
        }
    }

    #[test]
    fn test_kind_equality_ignores_name() {
        assert_eq!(ComponentKind::of::<Tag>(), ComponentKind::of::<Tag>());
        assert_ne!(ComponentKind::of::<Tag>(), ComponentKind::of::<Body>());
        assert_ne!(ComponentKind::of::<Body>(), ComponentKind::of::<dyn Physical>());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(ComponentKind::of::<Tag>().short_name(), "Tag");
        assert!(ComponentKind::of::<Tag>().name().ends_with("Tag"));
    }

    #[test]
    fn test_default_kind_is_concrete_type() {
        let tag: Box<dyn Component> = Box::new(Tag);
        assert_eq!(tag.kind(), ComponentKind::of::<Tag>());
    }

    #[test]
    fn test_satisfies_own_and_provided_kinds() {
        let b = body();
        assert!(b.satisfies(ComponentKind::of::<Body>()));
        assert!(b.satisfies(ComponentKind::of::<dyn Physical>()));
        assert!(!b.satisfies(ComponentKind::of::<Tag>()));
    }

    #[test]
    fn test_query_concrete_downcast() {
        let boxed: Box<dyn Component> = Box::new(body());
        let component: &dyn Component = &*boxed;
        assert!(<Body as Query>::view(component).is_some());
        assert!(<Tag as Query>::view(component).is_none());
    }

    #[test]
    fn test_query_capability_view() {
        let mut boxed: Box<dyn Component> = Box::new(body());
        let physical = <dyn Physical as Query>::view(&*boxed).unwrap();
        assert_eq!(physical.speed(), 5.0);

        <dyn Physical as Query>::view_mut(&mut *boxed)
            .unwrap()
            .set_position(Vec3::X);
        assert_eq!(<Body as Query>::view(&*boxed).unwrap().position, Vec3::X);

        let tag: Box<dyn Component> = Box::new(Tag);
        assert!(<dyn Physical as Query>::view(&*tag).is_none());
    }
}
