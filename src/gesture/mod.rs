// ABOUTME: Swipe-to-dismiss gesture tracking - drag displacement to opacity and a release decision
// The threshold is half the screen width, queried once from a ScreenMetrics capability

use serde::Serialize;

/// Screen size capability, queried when a tracker is built.
#[cfg_attr(test, mockall::automock)]
pub trait ScreenMetrics {
    fn width(&self) -> f64;
}

/// A screen of fixed width, for hosts that know their size up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScreen(pub f64);

impl ScreenMetrics for FixedScreen {
    fn width(&self) -> f64 {
        self.0
    }
}

/// Where a touch started, as reported by the view layer's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchTarget {
    Body,
    ConfirmButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GestureDecision {
    Commit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureSample {
    pub displacement: f64,
    pub opacity: f64,
    /// Only set for the sample produced at release.
    pub decision: Option<GestureDecision>,
}

/// 1 at rest, fading linearly to 0 at half the screen width either way.
pub fn opacity_for(displacement: f64, screen_width: f64) -> f64 {
    let half = screen_width / 2.0;
    if half <= 0.0 {
        return 1.0;
    }
    (1.0 - displacement.abs() / half).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    base: f64,
    displacement: f64,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    screen_width: f64,
    active: Option<ActiveTouch>,
}

impl GestureTracker {
    pub fn new(screen: &dyn ScreenMetrics) -> Self {
        Self {
            screen_width: screen.width(),
            active: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.screen_width / 2.0
    }

    /// A touch on the body claims the gesture at once. The confirm button keeps
    /// its own touches, and movement alone never claims one.
    pub const fn should_grant(target: TouchTarget) -> bool {
        matches!(target, TouchTarget::Body)
    }

    /// Start tracking. Movement is added to `current_offset`, so grabbing a
    /// settling element continues from where it is.
    pub fn grant(&mut self, current_offset: f64) {
        self.active = Some(ActiveTouch {
            base: current_offset,
            displacement: current_offset,
        });
    }

    /// Feed the cumulative horizontal movement since the grant.
    pub fn update(&mut self, dx: f64) -> Option<GestureSample> {
        let touch = self.active.as_mut()?;
        let displacement = touch.base + dx;
        touch.displacement = displacement;
        Some(self.sample(displacement, None))
    }

    /// End the touch and classify it. `None` when no touch was granted.
    pub fn release(&mut self) -> Option<GestureSample> {
        let touch = self.active.take()?;
        let decision = self.classify(touch.displacement);
        Some(self.sample(touch.displacement, Some(decision)))
    }

    pub fn classify(&self, displacement: f64) -> GestureDecision {
        if displacement.abs() > self.threshold() {
            GestureDecision::Commit
        } else {
            GestureDecision::Cancel
        }
    }

    pub fn reset(&mut self) {
        self.active = None;
    }

    fn sample(&self, displacement: f64, decision: Option<GestureDecision>) -> GestureSample {
        GestureSample {
            displacement,
            opacity: opacity_for(displacement, self.screen_width),
            decision,
        }
    }
}
