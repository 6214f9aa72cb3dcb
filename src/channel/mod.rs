// ABOUTME: Request channel - a (topic, controller id) keyed publish/subscribe registry
// Lets any caller show a snackbar without holding a reference to the controller

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::models::{ConfirmCallback, SnackbarOptions, SnackbarRequest, DEFAULT_CONFIRM_TEXT};

/// Topic controllers listen on for show requests.
pub const SHOW_SNACKBAR: &str = "showSnackBar";

const DEFAULT_CONTROLLER_ID: &str = "123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(String);

impl ControllerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ControllerId {
    fn default() -> Self {
        Self(DEFAULT_CONTROLLER_ID.to_string())
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;
type Key = (String, ControllerId);

/// Identifies one `subscribe` call so its owner can remove it without
/// removing a newer handler registered under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

struct Entry<T> {
    subscription: Subscription,
    handler: Handler<T>,
}

/// At-most-one delivery registry: one handler per `(topic, id)`, no buffering.
pub struct RequestChannel<T> {
    handlers: Arc<Mutex<HashMap<Key, Entry<T>>>>,
    next_subscription: Arc<AtomicU64>,
}

impl<T> Clone for RequestChannel<T> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_subscription: Arc::clone(&self.next_subscription),
        }
    }
}

impl<T> Default for RequestChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RequestChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestChannel")
            .field("subscribers", &self.lock().len())
            .finish()
    }
}

impl<T> RequestChannel<T> {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_subscription: Arc::new(AtomicU64::new(0)),
        }
    }

    // A panicking handler runs outside the lock, so poisoning never leaves the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Entry<T>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for `(topic, id)`, replacing any previous one.
    pub fn subscribe(
        &self,
        topic: &str,
        id: &ControllerId,
        handler: impl Fn(T) + Send + Sync + 'static,
    ) -> Subscription {
        let subscription = Subscription(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let entry = Entry {
            subscription,
            handler: Arc::new(handler),
        };
        let replaced = self
            .lock()
            .insert((topic.to_string(), id.clone()), entry)
            .is_some();
        debug!("Subscribed {}/{} (replaced: {})", topic, id, replaced);
        subscription
    }

    /// Returns `true` if a handler was registered.
    pub fn unsubscribe(&self, topic: &str, id: &ControllerId) -> bool {
        self.lock().remove(&(topic.to_string(), id.clone())).is_some()
    }

    /// Remove the handler for `(topic, id)` only if it is still `subscription`.
    pub fn release(&self, topic: &str, id: &ControllerId, subscription: Subscription) -> bool {
        let mut handlers = self.lock();
        let key = (topic.to_string(), id.clone());
        match handlers.get(&key) {
            Some(entry) if entry.subscription == subscription => {
                handlers.remove(&key);
                true
            }
            _ => false,
        }
    }

    pub fn is_subscribed(&self, topic: &str, id: &ControllerId) -> bool {
        self.lock().contains_key(&(topic.to_string(), id.clone()))
    }

    /// Deliver `payload` to the handler for `(topic, id)`.
    ///
    /// Returns `false` when nobody is listening; the payload is dropped.
    pub fn publish(&self, topic: &str, id: &ControllerId, payload: T) -> bool {
        let handler = self
            .lock()
            .get(&(topic.to_string(), id.clone()))
            .map(|entry| Arc::clone(&entry.handler));
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => {
                debug!("No subscriber for {}/{}, dropping", topic, id);
                false
            }
        }
    }

    /// Remove every subscription.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

lazy_static! {
    static ref GLOBAL_CHANNEL: RequestChannel<SnackbarRequest> = RequestChannel::new();
}

/// The process-wide channel used by the `show_snack_bar*` functions.
pub fn global() -> &'static RequestChannel<SnackbarRequest> {
    &GLOBAL_CHANNEL
}

/// Show `request` on the default controller. Fire and forget.
pub fn show_snack_bar(request: SnackbarRequest) {
    show_snack_bar_to(&ControllerId::default(), request);
}

/// Show `request` on the controller mounted under `id`. Fire and forget.
pub fn show_snack_bar_to(id: &ControllerId, request: SnackbarRequest) {
    global().publish(SHOW_SNACKBAR, id, request);
}

/// Show a snackbar with a confirm button labelled "OK" unless `options` says otherwise.
pub fn show_snack_bar_with_button(
    message: impl Into<String>,
    on_confirm: ConfirmCallback,
    options: SnackbarOptions,
) {
    show_snack_bar(button_request(message, on_confirm, options));
}

pub(crate) fn button_request(
    message: impl Into<String>,
    on_confirm: ConfirmCallback,
    options: SnackbarOptions,
) -> SnackbarRequest {
    SnackbarRequest::new(message)
        .with_confirm(DEFAULT_CONFIRM_TEXT, on_confirm)
        .with_options(options)
}
