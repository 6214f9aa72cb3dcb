// ABOUTME: AnimatedValue - a shared scalar that animations write and the view layer observes

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct AnimatedValue {
    tx: Arc<watch::Sender<f64>>,
}

impl AnimatedValue {
    pub fn new(initial: f64) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn set(&self, value: f64) {
        self.tx.send_replace(value);
    }

    /// Receiver that wakes on every write, for view layers that redraw on change.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }
}

impl Default for AnimatedValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let value = AnimatedValue::new(-48.0);
        let view = value.clone();
        value.set(0.0);
        assert!(view.get().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let value = AnimatedValue::default();
        let mut rx = value.subscribe();
        value.set(12.5);
        rx.changed().await.unwrap();
        assert!((*rx.borrow() - 12.5).abs() < f64::EPSILON);
    }
}
