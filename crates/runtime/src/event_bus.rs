use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::cycle::Cycle;

/// An event together with the cycle that was current when it was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queued<E> {
    pub cycle: Cycle,
    pub event: E,
}

/// Single-threaded FIFO of events waiting for the control loop.
///
/// Producers hold an [`EventEmitter`]; only the owner of the bus pops. The
/// queue is borrowed just long enough to push or pop one event, so an emitter
/// may be used from inside a render call without observing or disturbing the
/// cycle in progress.
pub struct EventBus<E> {
    queue: Rc<RefCell<VecDeque<Queued<E>>>>,
    cycle: Rc<Cell<Cycle>>,
}

/// Cloneable sending half of an [`EventBus`].
pub struct EventEmitter<E> {
    queue: Rc<RefCell<VecDeque<Queued<E>>>>,
    cycle: Rc<Cell<Cycle>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            cycle: Rc::new(Cell::new(Cycle::initial())),
        }
    }

    pub fn emitter(&self) -> EventEmitter<E> {
        EventEmitter {
            queue: Rc::clone(&self.queue),
            cycle: Rc::clone(&self.cycle),
        }
    }

    /// Stamps subsequently emitted events with `cycle`.
    pub fn set_cycle(&self, cycle: Cycle) {
        self.cycle.set(cycle);
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle.get()
    }

    pub fn pop(&self) -> Option<Queued<E>> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<Queued<E>> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.len())
            .field("cycle", &self.cycle.get())
            .finish()
    }
}

impl<E> EventEmitter<E> {
    pub fn emit(&self, event: E) {
        let cycle = self.cycle.get();
        self.queue.borrow_mut().push_back(Queued { cycle, event });
    }
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            cycle: Rc::clone(&self.cycle),
        }
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter").finish_non_exhaustive()
    }
}
