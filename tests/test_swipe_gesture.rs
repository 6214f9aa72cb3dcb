// ABOUTME: Swipe-to-dismiss tests driven through the controller handle on a 400px screen

mod common;

use common::{at, mount, SCREEN_WIDTH};
use pretty_assertions::assert_eq;
use snackbar_box::gesture::TouchTarget;
use snackbar_box::{Phase, SnackbarRequest};
use std::time::Duration;
use tokio::time::Instant;

fn request(hold_ms: u64) -> SnackbarRequest {
    SnackbarRequest::new("Archived")
        .with_duration(Duration::from_millis(hold_ms))
        .with_animation_time(Duration::from_millis(100))
}

#[tokio::test(start_paused = true)]
async fn test_swipe_past_half_width_dismisses() {
    let (_channel, handle) = mount("swipe-commit");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(SCREEN_WIDTH / 2.0 + 1.0).unwrap();

    at(start, 205).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::DragActive);
    assert!((view.drag_offset_x - 201.0).abs() < f64::EPSILON);
    assert!(view.opacity.abs() < f64::EPSILON);

    handle.touch_end().unwrap();
    at(start, 230).await;
    assert_eq!(handle.phase(), Phase::Idle);
    assert!(handle.view().drag_offset_x.abs() < f64::EPSILON);
    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_swipe_left_past_threshold_also_dismisses() {
    let (_channel, handle) = mount("swipe-left");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(-250.0).unwrap();
    handle.touch_end().unwrap();

    at(start, 230).await;
    assert_eq!(handle.phase(), Phase::Idle);
    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_short_swipe_springs_back() {
    let (_channel, handle) = mount("swipe-cancel");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(SCREEN_WIDTH / 2.0 - 1.0).unwrap();

    at(start, 205).await;
    let view = handle.view();
    assert!((view.opacity - 0.005).abs() < 1e-9);

    handle.touch_end().unwrap();
    at(start, 210).await;
    assert_eq!(handle.phase(), Phase::Visible);

    at(start, 2500).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::Visible);
    assert!(view.drag_offset_x.abs() < 0.5, "drag was {}", view.drag_offset_x);
    assert!(view.opacity > 0.99);

    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_regrab_during_spring_back_continues_from_offset() {
    let (_channel, handle) = mount("swipe-regrab");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(150.0).unwrap();
    handle.touch_end().unwrap();

    // About 147px are left after 20ms of critically damped spring.
    at(start, 220).await;
    assert_eq!(handle.phase(), Phase::Visible);
    assert!(handle.view().drag_offset_x > 100.0);

    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(100.0).unwrap();
    handle.touch_end().unwrap();

    at(start, 250).await;
    assert_eq!(handle.phase(), Phase::Idle);
    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_touch_on_button_never_drags() {
    let (_channel, handle) = mount("swipe-button");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::ConfirmButton).unwrap();
    handle.drag_move(300.0).unwrap();
    handle.touch_end().unwrap();

    at(start, 300).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::Visible);
    assert!(view.drag_offset_x.abs() < f64::EPSILON);
    assert!((view.opacity - 1.0).abs() < f64::EPSILON);

    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_drag_before_visible_is_ignored() {
    let (_channel, handle) = mount("swipe-early");
    let start = Instant::now();
    handle.show(request(5000)).unwrap();

    at(start, 50).await;
    assert_eq!(handle.phase(), Phase::Entering);
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(300.0).unwrap();

    at(start, 60).await;
    assert_eq!(handle.phase(), Phase::Entering);
    handle.touch_end().unwrap();

    at(start, 150).await;
    assert_eq!(handle.phase(), Phase::Visible);
    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_hold_expiring_mid_drag_waits_for_release() {
    let (_channel, handle) = mount("swipe-hold");
    let start = Instant::now();
    handle.show(request(500)).unwrap();

    at(start, 300).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(50.0).unwrap();

    // The hold ran out at 600.
    at(start, 800).await;
    assert_eq!(handle.phase(), Phase::DragActive);

    handle.touch_cancel().unwrap();
    at(start, 810).await;
    assert_eq!(handle.phase(), Phase::Exiting);

    at(start, 950).await;
    assert_eq!(handle.phase(), Phase::Idle);
    handle.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn test_new_request_mid_drag_restarts_and_drops_the_touch() {
    let (_channel, handle) = mount("swipe-supersede");
    let start = Instant::now();
    handle.show(request(500)).unwrap();

    at(start, 200).await;
    handle.touch_start(TouchTarget::Body).unwrap();
    handle.drag_move(120.0).unwrap();
    at(start, 205).await;
    assert_eq!(handle.phase(), Phase::DragActive);

    handle
        .show(
            SnackbarRequest::new("Replaced")
                .with_duration(Duration::from_millis(2000))
                .with_animation_time(Duration::from_millis(100)),
        )
        .unwrap();
    at(start, 210).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::Entering);
    assert_eq!(view.message.as_deref(), Some("Replaced"));
    assert!(view.drag_offset_x.abs() < f64::EPSILON);

    // The finger that started the old drag keeps moving and lifts.
    handle.drag_move(300.0).unwrap();
    handle.touch_end().unwrap();
    at(start, 220).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::Entering);
    assert!(view.drag_offset_x.abs() < f64::EPSILON);

    // The first hold would have run out at 600.
    at(start, 700).await;
    let view = handle.view();
    assert_eq!(view.phase, Phase::Visible);
    assert_eq!(view.message.as_deref(), Some("Replaced"));
    assert!(view.drag_offset_x.abs() < f64::EPSILON);

    handle.dispose().await;
}
