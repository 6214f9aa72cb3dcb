// ABOUTME: Snackbar controller - lifecycle state machine, its tokio runtime, and the view model

pub mod machine;
pub mod runtime;
pub mod view;

use serde::Serialize;

pub use machine::{ActiveSnackbar, Command, Event, HandleId, SnackbarMachine};
pub use runtime::{ControllerError, SnackbarController, SnackbarHandle};
pub use view::SnackbarView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    /// Nothing shown, nothing scheduled.
    #[default]
    Idle,
    Entering,
    /// Resting on screen while the hold timer runs.
    Visible,
    Exiting,
    /// The user is dragging; the hold timer keeps running.
    DragActive,
}
