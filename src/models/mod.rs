// ABOUTME: Core data models for snackbar requests, colors and text styles

pub mod request;
pub mod style;

pub use request::{
    ConfirmCallback, Position, RequestId, SnackbarOptions, SnackbarRequest, DEFAULT_CONFIRM_TEXT,
};
pub use style::{Color, ColorParseError, ResolvedStyle, StyleOverrides, TextAlign, TextStyle};
