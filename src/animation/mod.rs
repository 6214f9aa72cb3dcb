// ABOUTME: Animation driver capability - time-based transitions of a scalar with cancellable handles
// The controller only talks to the AnimationDriver trait; TokioAnimationDriver is the bundled backend

pub mod driver;
pub mod spring;
pub mod value;

pub use driver::TokioAnimationDriver;
pub use spring::{Spring, SpringConfig};
pub use value::AnimatedValue;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Timing {
        to: f64,
        duration: Duration,
        easing: Easing,
    },
    Spring {
        to: f64,
        config: SpringConfig,
    },
    Delay(Duration),
    Sequence(Vec<Animation>),
}

impl Animation {
    pub fn timing(to: f64, duration: Duration) -> Self {
        Self::Timing {
            to,
            duration,
            easing: Easing::default(),
        }
    }

    /// Zero-length transition: the value lands on `to` at once.
    pub fn jump(to: f64) -> Self {
        Self::timing(to, Duration::ZERO)
    }

    pub const fn spring(to: f64, config: SpringConfig) -> Self {
        Self::Spring { to, config }
    }
}

/// Called once when an animation or delay runs to completion. Never called after cancellation.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Shared view of a handle's cancellation flag, for driver backends to check before completing.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle to one scheduled transition or delay.
#[derive(Debug)]
pub struct AnimationHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl AnimationHandle {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    #[must_use]
    pub fn with_task(mut self, task: AbortHandle) -> Self {
        self.task = Some(task);
        self
    }

    pub fn token(&self) -> CancelToken {
        CancelToken(Arc::clone(&self.cancelled))
    }

    /// Stop the transition and suppress its completion. Calling this twice is harmless.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            if let Some(task) = &self.task {
                task.abort();
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for AnimationHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Time-based value transitions, supplied to the controller as a capability.
pub trait AnimationDriver: Send {
    fn animate(
        &self,
        value: &AnimatedValue,
        animation: Animation,
        on_complete: Completion,
    ) -> AnimationHandle;

    /// Single-shot timer.
    fn delay(&self, after: Duration, on_complete: Completion) -> AnimationHandle;
}
