use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Start,
    Win,
    Loss,
}

/// Append-only list of callbacks fired in registration order.
#[derive(Default)]
pub struct EventRegistry {
    handlers: Vec<Box<dyn FnMut()>>,
}

impl EventRegistry {
    pub fn register(&mut self, handler: impl FnMut() + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn fire(&mut self) {
        for handler in &mut self.handlers {
            handler();
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// One registry per [`GameEvent`].
#[derive(Debug, Default)]
pub struct Observers {
    start: EventRegistry,
    win: EventRegistry,
    loss: EventRegistry,
}

impl Observers {
    pub fn registry(&self, event: GameEvent) -> &EventRegistry {
        match event {
            GameEvent::Start => &self.start,
            GameEvent::Win => &self.win,
            GameEvent::Loss => &self.loss,
        }
    }

    pub fn register(&mut self, event: GameEvent, handler: impl FnMut() + 'static) {
        self.registry_mut(event).register(handler);
    }

    pub(crate) fn fire(&mut self, event: GameEvent) {
        let registry = self.registry_mut(event);
        log::debug!("Firing {:?} to {} observers", event, registry.len());
        registry.fire();
    }

    fn registry_mut(&mut self, event: GameEvent) -> &mut EventRegistry {
        match event {
            GameEvent::Start => &mut self.start,
            GameEvent::Win => &mut self.win,
            GameEvent::Loss => &mut self.loss,
        }
    }
}
