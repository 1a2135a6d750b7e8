//! Typed publish/subscribe channels for single-threaded game loops.
//!
//! A [`Channel`] is an ordered list of listener callbacks sharing one payload
//! type. Publishing walks the list in attachment order; publishing with no
//! listeners attached is a no-op. [`Channel::subscribe`] returns a
//! [`Subscription`] token used to detach the listener later.
//!
//! Channels are deliberately not `Sync`: they are meant to be owned by a
//! single simulation thread and passed by `&mut` reference. A listener that
//! panics unwinds out of [`Channel::publish`] without corrupting the listener
//! list; the remaining listeners are skipped for that publish only.
//! Re-entrant subscription from inside a listener is impossible by
//! construction, since `publish` holds the only mutable borrow.

/// Handle returned by [`Channel::subscribe`], used to detach that listener.
///
/// Tokens are unique per channel for the lifetime of the channel and stay
/// invalid once used, so detaching twice is a harmless no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Listener<T> {
    id: u64,
    callback: Box<dyn FnMut(&T)>,
}

/// An ordered set of listeners for one payload type.
pub struct Channel<T> {
    listeners: Vec<Listener<T>>,
    next_id: u64,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Channel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. Listeners are invoked in attachment order.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            callback: Box::new(callback),
        });
        Subscription(id)
    }

    /// Detach a previously attached listener.
    ///
    /// Returns false if the token was already detached (or belongs to a
    /// different channel), in which case nothing changes.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != subscription.0);
        self.listeners.len() != before
    }

    /// Invoke every attached listener with `value`, in attachment order.
    pub fn publish(&mut self, value: &T) {
        for listener in &mut self.listeners {
            (listener.callback)(value);
        }
    }

    /// Detach all listeners at once.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_channel() -> (Channel<i32>, Rc<RefCell<Vec<String>>>) {
        (Channel::new(), Rc::new(RefCell::new(Vec::new())))
    }

    #[test]
    fn publishes_in_attachment_order() {
        let (mut channel, seen) = recording_channel();
        let a = Rc::clone(&seen);
        channel.subscribe(move |v| a.borrow_mut().push(format!("first:{v}")));
        let b = Rc::clone(&seen);
        channel.subscribe(move |v| b.borrow_mut().push(format!("second:{v}")));

        channel.publish(&7);
        assert_eq!(*seen.borrow(), vec!["first:7", "second:7"]);
    }

    #[test]
    fn unsubscribe_detaches_only_that_listener() {
        let (mut channel, seen) = recording_channel();
        let a = Rc::clone(&seen);
        let first = channel.subscribe(move |v| a.borrow_mut().push(format!("first:{v}")));
        let b = Rc::clone(&seen);
        channel.subscribe(move |v| b.borrow_mut().push(format!("second:{v}")));

        assert!(channel.unsubscribe(first));
        channel.publish(&1);
        assert_eq!(*seen.borrow(), vec!["second:1"]);

        // Detaching twice is a no-op.
        assert!(!channel.unsubscribe(first));
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn publish_without_listeners_is_a_noop() {
        let mut channel: Channel<()> = Channel::new();
        channel.publish(&());
        assert!(channel.is_empty());
    }

    #[test]
    fn clear_detaches_everything() {
        let (mut channel, seen) = recording_channel();
        let a = Rc::clone(&seen);
        channel.subscribe(move |v| a.borrow_mut().push(v.to_string()));
        let b = Rc::clone(&seen);
        channel.subscribe(move |v| b.borrow_mut().push(v.to_string()));

        channel.clear();
        channel.publish(&3);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn listeners_attached_after_a_publish_see_later_publishes() {
        let (mut channel, seen) = recording_channel();
        channel.publish(&0);
        let a = Rc::clone(&seen);
        channel.subscribe(move |v| a.borrow_mut().push(v.to_string()));
        channel.publish(&5);
        assert_eq!(*seen.borrow(), vec!["5"]);
    }
}
