// ABOUTME: View model handed to the rendering layer - what to draw and where
// Offsets and opacity are sampled live; the rest changes only on phase transitions

use serde::Serialize;

use super::machine::ActiveSnackbar;
use super::Phase;
use crate::gesture::opacity_for;
use crate::models::{Position, RequestId, ResolvedStyle, TextStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnackbarView {
    pub phase: Phase,
    pub request_id: Option<RequestId>,
    pub message: Option<String>,
    /// Confirm button label as displayed (upper-cased).
    pub confirm_label: Option<String>,
    pub position: Option<Position>,
    pub height: Option<f64>,
    pub style: Option<ResolvedStyle>,
    pub text_style: TextStyle,
    /// Vertical offset: distance from the top (Top) or bottom (Bottom) edge.
    pub offset_primary: f64,
    pub drag_offset_x: f64,
    pub opacity: f64,
}

impl SnackbarView {
    pub fn hidden(text_style: TextStyle) -> Self {
        Self {
            phase: Phase::Idle,
            request_id: None,
            message: None,
            confirm_label: None,
            position: None,
            height: None,
            style: None,
            text_style,
            offset_primary: 0.0,
            drag_offset_x: 0.0,
            opacity: 1.0,
        }
    }

    pub(crate) fn from_state(
        phase: Phase,
        active: Option<&ActiveSnackbar>,
        text_style: TextStyle,
    ) -> Self {
        let Some(active) = active else {
            return Self::hidden(text_style);
        };
        Self {
            phase,
            request_id: Some(active.request.id),
            message: Some(active.request.message.clone()),
            confirm_label: active
                .request
                .confirm_text
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(str::to_uppercase),
            position: Some(active.position),
            height: Some(active.height),
            style: Some(active.style),
            ..Self::hidden(text_style)
        }
    }

    /// Fill in the animated fields.
    #[must_use]
    pub(crate) fn with_offsets(mut self, primary: f64, drag: f64, screen_width: f64) -> Self {
        self.offset_primary = primary;
        self.drag_offset_x = drag;
        self.opacity = opacity_for(drag, screen_width);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Idle
    }
}
