// ABOUTME: Tokio runtime for the snackbar state machine - owns handles, values and the event queue
// One task per mounted controller; every state change happens on that task, in queue order

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::machine::{Axis, Command, Event, HandleId, SnackbarMachine};
use super::view::SnackbarView;
use super::Phase;
use crate::animation::{AnimatedValue, AnimationDriver, AnimationHandle, TokioAnimationDriver};
use crate::channel::{ControllerId, RequestChannel, Subscription, SHOW_SNACKBAR};
use crate::config::ControllerConfig;
use crate::gesture::{FixedScreen, GestureTracker, ScreenMetrics, TouchTarget};
use crate::models::SnackbarRequest;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Snackbar controller {0} is no longer running")]
    Closed(ControllerId),
}

type PanicPayload = Box<dyn Any + Send + 'static>;

#[derive(Debug, Clone, Copy)]
enum Completed {
    Animation,
    Timer,
}

#[derive(Debug)]
enum ControllerMessage {
    Event(Event),
    TouchStart(TouchTarget),
    Completed(HandleId, Completed),
    SetDefaults(Box<ControllerConfig>),
    Shutdown,
}

pub struct SnackbarController {
    id: ControllerId,
    machine: SnackbarMachine,
    driver: Box<dyn AnimationDriver>,
    live: HashMap<HandleId, AnimationHandle>,
    primary: AnimatedValue,
    drag: AnimatedValue,
    view_tx: watch::Sender<SnackbarView>,
    tx: mpsc::UnboundedSender<ControllerMessage>,
    rx: mpsc::UnboundedReceiver<ControllerMessage>,
    channel: RequestChannel<SnackbarRequest>,
    subscription: Subscription,
    /// First confirm callback panic, handed back to whoever disposes the controller.
    confirm_panic: Option<PanicPayload>,
}

impl SnackbarController {
    /// Mount a controller on `channel` using the tokio driver and the configured screen width.
    pub fn mount(
        config: ControllerConfig,
        channel: &RequestChannel<SnackbarRequest>,
    ) -> SnackbarHandle {
        let driver = TokioAnimationDriver::new(config.frame_interval());
        let screen = FixedScreen(config.screen_width);
        Self::mount_with(config, channel, Box::new(driver), &screen)
    }

    /// Mount with explicit driver and screen capabilities. Must be called inside a tokio runtime.
    ///
    /// Subscribing replaces any controller already mounted under the same id.
    pub fn mount_with(
        config: ControllerConfig,
        channel: &RequestChannel<SnackbarRequest>,
        driver: Box<dyn AnimationDriver>,
        screen: &dyn ScreenMetrics,
    ) -> SnackbarHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = config.id.clone();
        let screen_width = screen.width();
        let text_style = config.text_style.clone();
        let (view_tx, view_rx) = watch::channel(SnackbarView::hidden(text_style));
        let primary = AnimatedValue::new(-config.max_height);
        let drag = AnimatedValue::new(0.0);

        let requests = tx.clone();
        let subscription = channel.subscribe(SHOW_SNACKBAR, &id, move |request| {
            // A stopped controller drops requests like an unmounted one.
            let _ = requests.send(ControllerMessage::Event(Event::Request(request)));
        });

        let controller = Self {
            id: id.clone(),
            machine: SnackbarMachine::new(config, GestureTracker::new(screen)),
            driver,
            live: HashMap::new(),
            primary: primary.clone(),
            drag: drag.clone(),
            view_tx,
            tx: tx.clone(),
            rx,
            channel: channel.clone(),
            subscription,
            confirm_panic: None,
        };
        let task = tokio::spawn(controller.run());

        SnackbarHandle {
            id,
            tx,
            view_rx,
            primary,
            drag,
            screen_width,
            task,
        }
    }

    async fn run(mut self) -> Option<PanicPayload> {
        info!("Snackbar controller {} mounted", self.id);

        while let Some(message) = self.rx.recv().await {
            match message {
                ControllerMessage::Event(event) => self.dispatch(event),
                ControllerMessage::TouchStart(target) => self.dispatch(Event::TouchStart {
                    target,
                    drag_offset: self.drag.get(),
                }),
                ControllerMessage::Completed(id, kind) => {
                    if self.live.remove(&id).is_none() {
                        debug!("Dropping completion for cancelled handle {:?}", id);
                        continue;
                    }
                    self.dispatch(match kind {
                        Completed::Animation => Event::AnimationFinished(id),
                        Completed::Timer => Event::TimerFired(id),
                    });
                }
                ControllerMessage::SetDefaults(config) => {
                    debug!("Controller {} defaults replaced", self.id);
                    self.machine.set_defaults(*config);
                }
                ControllerMessage::Shutdown => break,
            }
        }

        self.teardown();
        self.confirm_panic
    }

    fn dispatch(&mut self, event: Event) {
        let before = self.machine.phase();
        for command in self.machine.handle(event) {
            self.execute(command);
        }
        let after = self.machine.phase();
        if before != after {
            debug!("Controller {}: {:?} -> {:?}", self.id, before, after);
        }
        self.publish_view();
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Cancel(id) => {
                if let Some(handle) = self.live.remove(&id) {
                    handle.cancel();
                }
            }
            Command::SetOffset { axis, value } => self.value(axis).set(value),
            Command::Animate {
                id,
                axis,
                animation,
                ..
            } => {
                let on_complete = self.completion(id, Completed::Animation);
                let handle = self.driver.animate(self.value(axis), animation, on_complete);
                self.live.insert(id, handle);
            }
            Command::ArmTimer { id, after } => {
                let on_complete = self.completion(id, Completed::Timer);
                let handle = self.driver.delay(after, on_complete);
                self.live.insert(id, handle);
            }
            Command::InvokeConfirm(callback) => {
                // The exit that follows still runs; the panic resurfaces at dispose.
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback.invoke()));
                if let Err(payload) = outcome {
                    error!("Confirm callback on controller {} panicked", self.id);
                    self.confirm_panic.get_or_insert(payload);
                }
            }
        }
    }

    fn completion(&self, id: HandleId, kind: Completed) -> crate::animation::Completion {
        let tx = self.tx.clone();
        Box::new(move || {
            let _ = tx.send(ControllerMessage::Completed(id, kind));
        })
    }

    const fn value(&self, axis: Axis) -> &AnimatedValue {
        match axis {
            Axis::Primary => &self.primary,
            Axis::Drag => &self.drag,
        }
    }

    fn publish_view(&self) {
        let view = SnackbarView::from_state(
            self.machine.phase(),
            self.machine.active(),
            self.machine.defaults().text_style.clone(),
        );
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn teardown(&mut self) {
        // A newer controller mounted under the same id keeps its subscription.
        self.channel.release(SHOW_SNACKBAR, &self.id, self.subscription);
        self.dispatch(Event::Dispose);
        for (_, handle) in self.live.drain() {
            handle.cancel();
        }
        info!("Snackbar controller {} disposed", self.id);
    }
}

/// Cheap handle the view layer and tests use to talk to a mounted controller.
#[derive(Debug)]
pub struct SnackbarHandle {
    id: ControllerId,
    tx: mpsc::UnboundedSender<ControllerMessage>,
    view_rx: watch::Receiver<SnackbarView>,
    primary: AnimatedValue,
    drag: AnimatedValue,
    screen_width: f64,
    task: JoinHandle<Option<PanicPayload>>,
}

impl SnackbarHandle {
    pub const fn id(&self) -> &ControllerId {
        &self.id
    }

    fn send(&self, message: ControllerMessage) -> Result<(), ControllerError> {
        self.tx
            .send(message)
            .map_err(|_| ControllerError::Closed(self.id.clone()))
    }

    /// Show a request on this controller directly, bypassing the channel.
    pub fn show(&self, request: SnackbarRequest) -> Result<(), ControllerError> {
        self.send(ControllerMessage::Event(Event::Request(request)))
    }

    pub fn press_confirm(&self) -> Result<(), ControllerError> {
        self.send(ControllerMessage::Event(Event::ConfirmPressed))
    }

    /// Slide the current snackbar out without running its confirm callback.
    pub fn dismiss(&self) -> Result<(), ControllerError> {
        self.send(ControllerMessage::Event(Event::Dismiss))
    }

    pub fn touch_start(&self, target: TouchTarget) -> Result<(), ControllerError> {
        self.send(ControllerMessage::TouchStart(target))
    }

    /// Cumulative horizontal movement since the touch started.
    pub fn drag_move(&self, dx: f64) -> Result<(), ControllerError> {
        self.send(ControllerMessage::Event(Event::DragMove { dx }))
    }

    pub fn touch_end(&self) -> Result<(), ControllerError> {
        self.send(ControllerMessage::Event(Event::TouchEnd))
    }

    /// The platform took the touch away; treated like a release.
    pub fn touch_cancel(&self) -> Result<(), ControllerError> {
        self.touch_end()
    }

    pub fn set_defaults(&self, config: ControllerConfig) -> Result<(), ControllerError> {
        self.send(ControllerMessage::SetDefaults(Box::new(config)))
    }

    pub fn phase(&self) -> Phase {
        self.view_rx.borrow().phase
    }

    /// Current view with live offsets and opacity.
    pub fn view(&self) -> SnackbarView {
        self.view_rx
            .borrow()
            .clone()
            .with_offsets(self.primary.get(), self.drag.get(), self.screen_width)
    }

    /// Receiver that wakes on phase and content changes (not on every animation frame).
    pub fn watch(&self) -> watch::Receiver<SnackbarView> {
        self.view_rx.clone()
    }

    pub fn primary_offset(&self) -> watch::Receiver<f64> {
        self.primary.subscribe()
    }

    pub fn drag_offset(&self) -> watch::Receiver<f64> {
        self.drag.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Unsubscribe from the channel, cancel everything in flight and wait for the task.
    ///
    /// A panic raised by a confirm callback resurfaces here.
    pub async fn dispose(self) {
        let _ = self.tx.send(ControllerMessage::Shutdown);
        match self.task.await {
            Ok(Some(payload)) => panic::resume_unwind(payload),
            Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            Ok(None) | Err(_) => {}
        }
    }
}
