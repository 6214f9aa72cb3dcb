// ABOUTME: SnackbarRequest data model - an immutable description of one notification to display
// Optional fields are resolved against controller defaults when the request is accepted

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::style::{Color, StyleOverrides};

/// Label used by `show_snack_bar_with_button` when no confirm text is given.
pub const DEFAULT_CONFIRM_TEXT: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Bottom,
}

/// Callback run when the confirm button is pressed.
///
/// Panics raised by the callback are not caught by the controller.
#[derive(Clone)]
pub struct ConfirmCallback(Arc<dyn Fn() + Send + Sync>);

impl ConfirmCallback {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)();
    }
}

impl fmt::Debug for ConfirmCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfirmCallback(..)")
    }
}

#[derive(Debug, Clone)]
pub struct SnackbarRequest {
    pub id: RequestId,
    pub message: String,
    pub confirm_text: Option<String>,
    pub on_confirm: Option<ConfirmCallback>,
    pub duration: Option<Duration>,
    pub animation_time: Option<Duration>,
    pub position: Option<Position>,
    pub margin_from_top: Option<f64>,
    pub height: Option<f64>,
    pub style: StyleOverrides,
}

/// Everything a caller can set besides the message and the confirm callback.
#[derive(Debug, Clone, Default)]
pub struct SnackbarOptions {
    pub confirm_text: Option<String>,
    pub duration: Option<Duration>,
    pub animation_time: Option<Duration>,
    pub position: Option<Position>,
    pub margin_from_top: Option<f64>,
    pub height: Option<f64>,
    pub style: StyleOverrides,
}

impl SnackbarRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            message: message.into(),
            confirm_text: None,
            on_confirm: None,
            duration: None,
            animation_time: None,
            position: None,
            margin_from_top: None,
            height: None,
            style: StyleOverrides::default(),
        }
    }

    /// Requests with an empty message are ignored by the controller.
    pub fn is_valid(&self) -> bool {
        !self.message.is_empty()
    }

    #[must_use]
    pub fn with_options(mut self, options: SnackbarOptions) -> Self {
        self.confirm_text = options.confirm_text.or(self.confirm_text);
        self.duration = options.duration.or(self.duration);
        self.animation_time = options.animation_time.or(self.animation_time);
        self.position = options.position.or(self.position);
        self.margin_from_top = options.margin_from_top.or(self.margin_from_top);
        self.height = options.height.or(self.height);
        self.style = StyleOverrides {
            text_color: options.style.text_color.or(self.style.text_color),
            button_color: options.style.button_color.or(self.style.button_color),
            background_color: options.style.background_color.or(self.style.background_color),
        };
        self
    }

    #[must_use]
    pub fn with_confirm(mut self, text: impl Into<String>, on_confirm: ConfirmCallback) -> Self {
        self.confirm_text = Some(text.into());
        self.on_confirm = Some(on_confirm);
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub const fn with_animation_time(mut self, animation_time: Duration) -> Self {
        self.animation_time = Some(animation_time);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_margin_from_top(mut self, margin: f64) -> Self {
        self.margin_from_top = Some(margin);
        self
    }

    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub const fn with_background_color(mut self, color: Color) -> Self {
        self.style.background_color = Some(color);
        self
    }

    #[must_use]
    pub const fn with_text_color(mut self, color: Color) -> Self {
        self.style.text_color = Some(color);
        self
    }

    #[must_use]
    pub const fn with_button_color(mut self, color: Color) -> Self {
        self.style.button_color = Some(color);
        self
    }
}
