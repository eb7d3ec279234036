use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::devreg::irq::UpdateEvent;

struct Inner<const N: usize> {
    events: Deque<UpdateEvent, N>,
    dropped: u32,
}

/// Hands [`UpdateEvent`]s from the interrupt handler to the main loop.
///
/// Fixed capacity, no allocation, usable from a `static`. Each operation
/// runs inside a critical section. When full, new events are dropped and
/// counted; the queue never blocks the handler.
///
/// ```
/// use i2c_devreg::devreg::{EventQueue, UpdateEvent};
///
/// static EVENTS: EventQueue<4> = EventQueue::new();
///
/// // interrupt handler
/// EVENTS.post(UpdateEvent { vector: 1, failed: false });
///
/// // main loop
/// while let Some(event) = EVENTS.take() {
///     assert_eq!(event.vector, 1);
/// }
/// ```
pub struct EventQueue<const N: usize> {
    inner: Mutex<RefCell<Inner<N>>>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                events: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Appends `event`. Returns false if the queue was full and the event was dropped.
    pub fn post(&self, event: UpdateEvent) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.events.push_back(event).is_err() {
                inner.dropped = inner.dropped.saturating_add(1);
                log::warn!("update event dropped, queue full");
                return false;
            }
            true
        })
    }

    /// Removes the oldest event.
    pub fn take(&self) -> Option<UpdateEvent> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
