// ABOUTME: Library crate for Snackbar-in-a-Box exposing the controller, channel and show API

pub mod animation;
pub mod channel;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod models;

pub use channel::{
    show_snack_bar, show_snack_bar_to, show_snack_bar_with_button, ControllerId, RequestChannel,
};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{Phase, SnackbarController, SnackbarHandle, SnackbarView};
pub use models::{ConfirmCallback, Position, SnackbarOptions, SnackbarRequest};
