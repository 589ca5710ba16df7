use std::rc::Rc;
use crate::behavior::Behavior;
use crate::component::Component;
use crate::rule::DynRule;

/// A behavior that runs against the entity carrying it
///
/// The behavior is lent out while it runs, so it can look at and mutate the
/// whole system, including its own entity.
#[derive(Default)]
pub struct LocalBehavior {
    behavior: Option<Box<dyn Behavior>>,
}

impl LocalBehavior {
    pub fn new(behavior: impl Behavior + 'static) -> Self {
        Self {
            behavior: Some(Box::new(behavior)),
        }
    }

    /// Lend the behavior out; `None` while it is already running
    pub fn take(&mut self) -> Option<Box<dyn Behavior>> {
        self.behavior.take()
    }

    /// Return a lent behavior
    pub fn restore(&mut self, behavior: Box<dyn Behavior>) {
        self.behavior.get_or_insert(behavior);
    }

    pub fn is_running(&self) -> bool {
        self.behavior.is_none()
    }
}

impl Component for LocalBehavior {}

/// Rules that run against the entity carrying them
///
/// The list is shared so a renderer can hold on to it while a rule removes
/// the entity.
#[derive(Clone)]
pub struct RuleSet {
    rules: Rc<[Box<dyn DynRule>]>,
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn DynRule>>) -> Self {
        Self { rules: rules.into() }
    }

    /// Shared handle to the rules
    pub fn rules(&self) -> Rc<[Box<dyn DynRule>]> {
        Rc::clone(&self.rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Component for RuleSet {}
