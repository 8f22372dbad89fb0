//! Push signals
//!
//! Latest-value cells with observer callbacks, used to feed host events
//! (scroll progress, visibility) into a mounted scene. Readers never block:
//! they see whatever value was pushed last. Single-threaded by construction.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Observer<T> = Box<dyn FnMut(T)>;

struct Shared<T> {
    value: Cell<T>,
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_id: Cell<u64>,
}

/// A value that notifies subscribers whenever it is set.
///
/// Cloning yields another handle to the same signal.
pub struct Signal<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Copy + 'static> Signal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: Cell::new(initial),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.get()
    }

    /// Store `value` and hand it to every observer. Observers must not set
    /// or subscribe to the same signal from inside the callback.
    pub fn set(&self, value: T) {
        self.shared.value.set(value);
        for (_, observer) in self.shared.observers.borrow_mut().iter_mut() {
            observer(value);
        }
    }

    /// Register `observer`; it stays attached until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, observer: impl FnMut(T) + 'static) -> Subscription {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        self.shared
            .observers
            .borrow_mut()
            .push((id, Box::new(observer)));

        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.observers.borrow_mut().retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.borrow().len()
    }
}

impl<T: Copy + Default + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Detaches its observer when dropped.
#[must_use = "dropping a subscription detaches the observer immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}
