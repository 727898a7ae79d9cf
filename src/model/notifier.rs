//! Change notification for entity stores
//!
//! Subscribers receive the full current contents after each successful
//! mutation. The event says *that* something changed, never *what*; a
//! subscriber re-reads the whole slice.

use std::fmt;

use crate::domain::RecordKind;

/// Emitted once per successful mutation
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a, T> {
    pub kind: RecordKind,
    /// Store revision after the mutation
    pub revision: u64,
    pub contents: &'a [T],
}

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn Fn(&ChangeEvent<'_, T>)>;

pub struct ChangeNotifier<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<T> ChangeNotifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<'_, T>) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Delivers the event to every subscriber in subscription order
    pub fn emit(&self, event: &ChangeEvent<'_, T>) {
        for (_, subscriber) in &self.subscribers {
            subscriber(event);
        }
    }
}

impl<T> fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_to_all_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier: ChangeNotifier<u32> = ChangeNotifier::new();

        let first = Rc::clone(&seen);
        notifier.subscribe(move |e| first.borrow_mut().push(("first", e.contents.len())));
        let second = Rc::clone(&seen);
        notifier.subscribe(move |e| second.borrow_mut().push(("second", e.contents.len())));

        notifier.emit(&ChangeEvent {
            kind: RecordKind::Employee,
            revision: 1,
            contents: &[1, 2, 3],
        });

        assert_eq!(*seen.borrow(), vec![("first", 3), ("second", 3)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier: ChangeNotifier<u32> = ChangeNotifier::new();

        let counter = Rc::clone(&count);
        let id = notifier.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));

        notifier.emit(&ChangeEvent {
            kind: RecordKind::Employee,
            revision: 1,
            contents: &[],
        });
        assert_eq!(*count.borrow(), 0);
    }
}
