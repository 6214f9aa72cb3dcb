// ABOUTME: Shared helpers for controller integration tests running on a paused tokio clock

#![allow(dead_code)]

use snackbar_box::{
    ConfirmCallback, ControllerConfig, ControllerId, RequestChannel, SnackbarController,
    SnackbarHandle, SnackbarRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

pub const SCREEN_WIDTH: f64 = 400.0;

pub fn config(id: &str) -> ControllerConfig {
    ControllerConfig {
        id: ControllerId::new(id),
        screen_width: SCREEN_WIDTH,
        ..ControllerConfig::default()
    }
}

pub fn mount(id: &str) -> (RequestChannel<SnackbarRequest>, SnackbarHandle) {
    let channel = RequestChannel::new();
    let handle = SnackbarController::mount(config(id), &channel);
    (channel, handle)
}

/// Sleep until `ms` milliseconds after `start`.
pub async fn at(start: Instant, ms: u64) {
    sleep_until(start + Duration::from_millis(ms)).await;
}

pub fn counting_callback() -> (Arc<AtomicUsize>, ConfirmCallback) {
    let hits = Arc::new(AtomicUsize::new(0));
    let inner = hits.clone();
    (
        hits,
        ConfirmCallback::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

pub fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
