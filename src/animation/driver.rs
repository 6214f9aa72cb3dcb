// ABOUTME: Tokio-backed AnimationDriver - each transition runs as a task writing frames to its value
// Frames are paced with tokio::time so paused-clock tests are deterministic

use futures_util::future::{BoxFuture, FutureExt};
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

use super::{
    Animation, AnimatedValue, AnimationDriver, AnimationHandle, CancelToken, Completion, Easing,
    Spring, SpringConfig,
};

/// Upper bound on how long a spring may run before it is snapped to its target.
const MAX_SPRING_TIME: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct TokioAnimationDriver {
    frame_interval: Duration,
}

impl TokioAnimationDriver {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    fn spawn(
        &self,
        handle: AnimationHandle,
        work: BoxFuture<'static, ()>,
        on_complete: Completion,
    ) -> AnimationHandle {
        let token = handle.token();
        let task = tokio::spawn(async move {
            work.await;
            finish(&token, on_complete);
        });
        handle.with_task(task.abort_handle())
    }
}

impl Default for TokioAnimationDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

fn finish(token: &CancelToken, on_complete: Completion) {
    if !token.is_cancelled() {
        on_complete();
    }
}

impl AnimationDriver for TokioAnimationDriver {
    fn animate(
        &self,
        value: &AnimatedValue,
        animation: Animation,
        on_complete: Completion,
    ) -> AnimationHandle {
        let handle = AnimationHandle::new();
        let frames = Frames {
            value: value.clone(),
            interval: self.frame_interval,
            token: handle.token(),
        };
        let work = async move { frames.run(&animation).await }.boxed();
        self.spawn(handle, work, on_complete)
    }

    fn delay(&self, after: Duration, on_complete: Completion) -> AnimationHandle {
        self.spawn(AnimationHandle::new(), sleep(after).boxed(), on_complete)
    }
}

/// Writes frames of one transition into a value, stopping as soon as its
/// handle is cancelled.
struct Frames {
    value: AnimatedValue,
    interval: Duration,
    token: CancelToken,
}

impl Frames {
    /// Returns `false` once cancelled; the value is left where it is.
    fn write(&self, to: f64) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.value.set(to);
        true
    }

    fn run<'a>(&'a self, animation: &'a Animation) -> BoxFuture<'a, ()> {
        async move {
            match animation {
                Animation::Timing {
                    to,
                    duration,
                    easing,
                } => self.run_timing(*to, *duration, *easing).await,
                Animation::Spring { to, config } => self.run_spring(*to, *config).await,
                Animation::Delay(duration) => sleep(*duration).await,
                Animation::Sequence(steps) => {
                    for step in steps {
                        if self.token.is_cancelled() {
                            return;
                        }
                        self.run(step).await;
                    }
                }
            }
        }
        .boxed()
    }

    async fn run_timing(&self, to: f64, duration: Duration, easing: Easing) {
        if duration.is_zero() {
            self.write(to);
            return;
        }

        let from = self.value.get();
        let start = Instant::now();
        let end = start + duration;
        loop {
            let next = (Instant::now() + self.interval).min(end);
            sleep_until(next).await;
            if next >= end {
                self.write(to);
                return;
            }
            let progress = (next - start).as_secs_f64() / duration.as_secs_f64();
            if !self.write(from + (to - from) * easing.apply(progress)) {
                return;
            }
        }
    }

    async fn run_spring(&self, to: f64, config: SpringConfig) {
        let spring = Spring::new(config, self.value.get() - to, 0.0);
        let start = Instant::now();
        loop {
            sleep(self.interval).await;
            let elapsed = start.elapsed();
            let t = elapsed.as_secs_f64();
            if spring.is_at_rest(t) || elapsed >= MAX_SPRING_TIME {
                self.write(to);
                return;
            }
            if !self.write(to + spring.displacement(t)) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting() -> (Arc<AtomicUsize>, Completion) {
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = hits.clone();
        (
            hits,
            Box::new(move || {
                inner.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn timing_reaches_target_at_its_duration() {
        let driver = TokioAnimationDriver::default();
        let value = AnimatedValue::new(-48.0);
        let (hits, done) = counting();
        let slide = Animation::timing(0.0, Duration::from_millis(100));
        let _handle = driver.animate(&value, slide, done);

        sleep(Duration::from_millis(50)).await;
        assert!(value.get() > -48.0 && value.get() < 0.0, "mid-way value was {}", value.get());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(60)).await;
        assert!(value.get().abs() < f64::EPSILON);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_animation_never_completes() {
        let driver = TokioAnimationDriver::default();
        let value = AnimatedValue::new(0.0);
        let (hits, done) = counting();
        let slide = Animation::timing(100.0, Duration::from_millis(100));
        let handle = driver.animate(&value, slide, done);

        sleep(Duration::from_millis(40)).await;
        handle.cancel();
        let frozen = value.get();

        sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!((value.get() - frozen).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_fires_once_after_its_duration() {
        let driver = TokioAnimationDriver::default();
        let (hits, done) = counting();
        let _handle = driver.delay(Duration::from_millis(1000), done);

        sleep(Duration::from_millis(999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_runs_steps_in_order() {
        let driver = TokioAnimationDriver::default();
        let value = AnimatedValue::new(-48.0);
        let (hits, done) = counting();
        let sequence = Animation::Sequence(vec![
            Animation::timing(0.0, Duration::from_millis(100)),
            Animation::Delay(Duration::from_millis(500)),
            Animation::timing(-48.0, Duration::from_millis(100)),
        ]);
        let _handle = driver.animate(&value, sequence, done);

        sleep(Duration::from_millis(300)).await;
        assert!(value.get().abs() < f64::EPSILON, "holding at rest");
        sleep(Duration::from_millis(450)).await;
        assert!((value.get() + 48.0).abs() < f64::EPSILON);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn spring_settles_exactly_on_target() {
        let driver = TokioAnimationDriver::default();
        let value = AnimatedValue::new(120.0);
        let (hits, done) = counting();
        let _handle = driver.animate(&value, Animation::spring(0.0, SpringConfig::default()), done);

        let mut last = value.get();
        for _ in 0..40 {
            sleep(Duration::from_millis(16)).await;
            let now = value.get();
            assert!(now <= last && now >= 0.0, "spring was not monotonic: {last} -> {now}");
            last = now;
        }
        sleep(Duration::from_secs(2)).await;
        assert!(value.get().abs() < f64::EPSILON);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_frames_never_write_even_before_abort_lands() {
        // No task attached, so cancel only flips the token.
        let handle = AnimationHandle::new();
        let value = AnimatedValue::new(5.0);
        let frames = Frames {
            value: value.clone(),
            interval: Duration::from_millis(16),
            token: handle.token(),
        };
        handle.cancel();

        frames
            .run(&Animation::timing(100.0, Duration::from_millis(100)))
            .await;
        frames.run(&Animation::jump(100.0)).await;
        frames
            .run(&Animation::spring(100.0, SpringConfig::default()))
            .await;
        frames
            .run(&Animation::Sequence(vec![Animation::jump(100.0)]))
            .await;

        assert!((value.get() - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn jump_completes_without_waiting() {
        let driver = TokioAnimationDriver::default();
        let value = AnimatedValue::new(0.0);
        let (hits, done) = counting();
        let _handle = driver.animate(&value, Animation::jump(-48.0), done);

        sleep(Duration::from_millis(1)).await;
        assert!((value.get() + 48.0).abs() < f64::EPSILON);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
