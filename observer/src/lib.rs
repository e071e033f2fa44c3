// MIT LICENSE
//
// Copyright (c) 2023 Dash Core Group
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Single-threaded observer/observable links.
//!
//! An [`Observable`] fans notifications out to any number of [`Observer`]s.
//! The subscription is a bidirectional non-owning link: whichever side is
//! dropped first detaches the other deterministically, so neither side has
//! to outlive its peer. An observer may unsubscribe itself from inside its
//! own notification callback.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

type NotifyFn<T> = Box<dyn FnMut(&T)>;

struct ObserverInner<T> {
    /// Back-link to the observable this observer is attached to, if any.
    observable: Option<Weak<RefCell<ObservableInner<T>>>>,
    // Callbacks live in `Option`s so they can be taken out of the cell for
    // the duration of a call; a callback that detaches its own observer
    // would otherwise hit an already-borrowed cell.
    on_subscribe: Option<NotifyFn<T>>,
    on_notify: Option<NotifyFn<T>>,
    on_unsubscribe: Option<Box<dyn FnMut()>>,
}

struct ObservableInner<T> {
    subscribers: Vec<Weak<RefCell<ObserverInner<T>>>>,
}

/// Receiving end of a subscription.
///
/// Holds three callbacks: one fired with a snapshot when the observer gets
/// attached, one per notification, and one when the link is severed from
/// either side. Dropping the observer unsubscribes it.
pub struct Observer<T> {
    inner: Rc<RefCell<ObserverInner<T>>>,
}

impl<T> Observer<T> {
    pub fn new(
        on_subscribe: impl FnMut(&T) + 'static,
        on_notify: impl FnMut(&T) + 'static,
        on_unsubscribe: impl FnMut() + 'static,
    ) -> Self {
        Observer {
            inner: Rc::new(RefCell::new(ObserverInner {
                observable: None,
                on_subscribe: Some(Box::new(on_subscribe)),
                on_notify: Some(Box::new(on_notify)),
                on_unsubscribe: Some(Box::new(on_unsubscribe)),
            })),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.borrow().observable.is_some()
    }

    /// Severs the link, if any. Fires `on_unsubscribe` exactly once per
    /// active subscription; calling this on a detached observer is a no-op.
    pub fn unsubscribe(&self) {
        detach(&Rc::downgrade(&self.inner));
    }

    /// A weak handle that can detach this observer later, e.g. from inside
    /// one of its own callbacks.
    pub fn detach_handle(&self) -> DetachHandle<T> {
        DetachHandle {
            observer: Rc::downgrade(&self.inner),
        }
    }
}

impl<T> Drop for Observer<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Weak detaching handle for an [`Observer`]; see
/// [`Observer::detach_handle`].
pub struct DetachHandle<T> {
    observer: Weak<RefCell<ObserverInner<T>>>,
}

impl<T> Clone for DetachHandle<T> {
    fn clone(&self) -> Self {
        DetachHandle {
            observer: self.observer.clone(),
        }
    }
}

impl<T> DetachHandle<T> {
    pub fn unsubscribe(&self) {
        detach(&self.observer);
    }
}

/// Emitting end of a subscription. Dropping it detaches every subscriber.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Observable<T> {
    pub fn new() -> Self {
        Observable {
            inner: Rc::new(RefCell::new(ObservableInner {
                subscribers: Vec::new(),
            })),
        }
    }

    /// Attaches `observer` and hands it `snapshot` through its subscribe
    /// callback. An observer that is already subscribed somewhere (here
    /// included) is detached first.
    pub fn subscribe(&self, observer: &Observer<T>, snapshot: T) {
        if observer.is_subscribed() {
            observer.unsubscribe();
        }
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&observer.inner));
        observer.inner.borrow_mut().observable = Some(Rc::downgrade(&self.inner));
        with_callback(&observer.inner, |i| &mut i.on_subscribe, |f| f(&snapshot));
    }

    /// Fans `data` out to all current subscribers in subscription order.
    pub fn notify(&self, data: &T) {
        // Snapshot the list up front: a callback may detach its own
        // observer, which mutates the live list.
        let subscribers = self.inner.borrow().subscribers.clone();
        for weak in subscribers {
            let Some(subscriber) = weak.upgrade() else {
                continue;
            };
            let still_attached = subscriber
                .borrow()
                .observable
                .as_ref()
                .is_some_and(|link| std::ptr::eq(link.as_ptr(), Rc::as_ptr(&self.inner)));
            if still_attached {
                with_callback(&subscriber, |i| &mut i.on_notify, |f| f(data));
            }
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T> Drop for Observable<T> {
    fn drop(&mut self) {
        let subscribers = std::mem::take(&mut self.inner.borrow_mut().subscribers);
        for weak in subscribers {
            let Some(subscriber) = weak.upgrade() else {
                continue;
            };
            if subscriber.borrow_mut().observable.take().is_some() {
                with_callback(&subscriber, |i| &mut i.on_unsubscribe, |f| f());
            }
        }
    }
}

/// Severs an observer's link from whichever side asked for it: clears the
/// back-link, removes the observer from the subscriber list, and fires
/// `on_unsubscribe`. No-op when the observer is gone or not subscribed.
fn detach<T>(observer: &Weak<RefCell<ObserverInner<T>>>) {
    let Some(subscriber) = observer.upgrade() else {
        return;
    };
    let Some(link) = subscriber.borrow_mut().observable.take() else {
        return;
    };
    if let Some(observable) = link.upgrade() {
        observable
            .borrow_mut()
            .subscribers
            .retain(|weak| !std::ptr::eq(weak.as_ptr(), Rc::as_ptr(&subscriber)));
    }
    with_callback(&subscriber, |i| &mut i.on_unsubscribe, |f| f());
}

/// Takes a callback out of the observer cell, runs it with no borrow held,
/// and puts it back.
fn with_callback<T, F>(
    observer: &Rc<RefCell<ObserverInner<T>>>,
    field: impl Fn(&mut ObserverInner<T>) -> &mut Option<F>,
    call: impl FnOnce(&mut F),
) {
    let mut taken = field(&mut observer.borrow_mut()).take();
    if let Some(f) = taken.as_mut() {
        call(f);
    }
    *field(&mut observer.borrow_mut()) = taken;
}
