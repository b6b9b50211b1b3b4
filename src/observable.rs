//! Synchronous listener lists

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A typed listener list with synchronous, in-order delivery.
pub struct Observable<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Observable<T> {
    /// An observable with no listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it is called after the listeners registered before it.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        before != self.listeners.len()
    }

    /// Call every listener with `value`.
    pub fn emit(&mut self, value: &T) {
        for (_, listener) in &mut self.listeners {
            listener(value);
        }
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_to_current_subscribers_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observable::new();
        let s = Rc::clone(&seen);
        let id = obs.subscribe(move |v: &u8| s.borrow_mut().push(*v));
        obs.emit(&1);
        assert!(obs.unsubscribe(id));
        obs.emit(&2);
        assert_eq!(*seen.borrow(), vec![1]);
        assert!(obs.is_empty());
    }
}
