// ABOUTME: Snackbar lifecycle state machine - one transition function from events to commands
// Pure with respect to time and I/O; the runtime executes the commands it returns

use std::time::Duration;
use tracing::{debug, info};

use super::Phase;
use crate::animation::Animation;
use crate::config::ControllerConfig;
use crate::gesture::{GestureDecision, GestureTracker, TouchTarget};
use crate::models::{ConfirmCallback, Position, ResolvedStyle, SnackbarRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

/// Which animated scalar a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Vertical slide offset.
    Primary,
    /// Horizontal swipe offset.
    Drag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Enter,
    Exit,
    SpringBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTrigger {
    Timeout,
    Confirm,
    Swipe,
    Dismiss,
}

#[derive(Debug, Clone)]
pub enum Event {
    Request(SnackbarRequest),
    AnimationFinished(HandleId),
    TimerFired(HandleId),
    ConfirmPressed,
    Dismiss,
    TouchStart { target: TouchTarget, drag_offset: f64 },
    DragMove { dx: f64 },
    TouchEnd,
    Dispose,
}

#[derive(Debug, Clone)]
pub enum Command {
    Cancel(HandleId),
    SetOffset {
        axis: Axis,
        value: f64,
    },
    Animate {
        id: HandleId,
        kind: AnimationKind,
        axis: Axis,
        animation: Animation,
    },
    ArmTimer {
        id: HandleId,
        after: Duration,
    },
    InvokeConfirm(ConfirmCallback),
}

/// A request with every optional field resolved against the controller defaults.
#[derive(Debug, Clone)]
pub struct ActiveSnackbar {
    pub request: SnackbarRequest,
    pub duration: Duration,
    pub animation_time: Duration,
    pub position: Position,
    pub margin_from_top: f64,
    pub height: f64,
    pub style: ResolvedStyle,
}

impl ActiveSnackbar {
    pub fn resolve(request: SnackbarRequest, defaults: &ControllerConfig) -> Self {
        let style = ResolvedStyle {
            text_color: request.style.text_color.unwrap_or(defaults.text_color),
            button_color: request.style.button_color.unwrap_or(defaults.button_color),
            background_color: request
                .style
                .background_color
                .unwrap_or(defaults.background_color),
        };
        Self {
            duration: request.duration.unwrap_or_else(|| defaults.duration()),
            animation_time: request
                .animation_time
                .unwrap_or_else(|| defaults.animation_time()),
            position: request.position.unwrap_or(defaults.position),
            margin_from_top: request.margin_from_top.unwrap_or(defaults.margin_from_top),
            height: request.height.unwrap_or(defaults.max_height),
            style,
            request,
        }
    }

    /// Offset the snackbar rests at while shown.
    pub const fn rest_offset(&self) -> f64 {
        match self.position {
            Position::Top => self.margin_from_top,
            Position::Bottom => 0.0,
        }
    }

    /// Offset that puts the snackbar just off-screen.
    pub fn hidden_offset(&self) -> f64 {
        -self.height
    }
}

#[derive(Debug)]
pub struct SnackbarMachine {
    defaults: ControllerConfig,
    phase: Phase,
    active: Option<ActiveSnackbar>,
    pending_timer: Option<HandleId>,
    pending_animations: Vec<(HandleId, AnimationKind)>,
    // Hold time ran out while the user was dragging.
    exit_due: bool,
    gesture: GestureTracker,
    next_handle: u64,
}

impl SnackbarMachine {
    pub const fn new(defaults: ControllerConfig, gesture: GestureTracker) -> Self {
        Self {
            defaults,
            phase: Phase::Idle,
            active: None,
            pending_timer: None,
            pending_animations: Vec::new(),
            exit_due: false,
            gesture,
            next_handle: 0,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn active(&self) -> Option<&ActiveSnackbar> {
        self.active.as_ref()
    }

    pub const fn defaults(&self) -> &ControllerConfig {
        &self.defaults
    }

    /// Replace the defaults; they apply from the next accepted request.
    pub fn set_defaults(&mut self, defaults: ControllerConfig) {
        self.defaults = defaults;
    }

    /// Apply one event. Events that make no sense in the current phase are ignored.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match (self.phase, event) {
            (_, Event::Request(request)) => self.accept(request),
            (_, Event::AnimationFinished(id)) => self.animation_finished(id),
            (_, Event::TimerFired(id)) => self.timer_fired(id),
            (Phase::Entering | Phase::Visible, Event::ConfirmPressed) => {
                self.begin_exit(ExitTrigger::Confirm)
            }
            (Phase::Entering | Phase::Visible | Phase::DragActive, Event::Dismiss) => {
                self.begin_exit(ExitTrigger::Dismiss)
            }
            (Phase::Visible, Event::TouchStart { target, drag_offset })
                if GestureTracker::should_grant(target) =>
            {
                self.start_drag(drag_offset)
            }
            (Phase::DragActive, Event::DragMove { dx }) => self
                .gesture
                .update(dx)
                .map(|sample| {
                    vec![Command::SetOffset {
                        axis: Axis::Drag,
                        value: sample.displacement,
                    }]
                })
                .unwrap_or_default(),
            (Phase::DragActive, Event::TouchEnd) => self.release_drag(),
            (_, Event::Dispose) => self.dispose(),
            (phase, event) => {
                debug!("Ignoring {:?} while {:?}", event, phase);
                Vec::new()
            }
        }
    }

    fn alloc(&mut self) -> HandleId {
        self.next_handle += 1;
        HandleId(self.next_handle)
    }

    fn animate(&mut self, kind: AnimationKind, axis: Axis, animation: Animation) -> Command {
        let id = self.alloc();
        self.pending_animations.push((id, kind));
        Command::Animate {
            id,
            kind,
            axis,
            animation,
        }
    }

    fn cancel_all(&mut self) -> Vec<Command> {
        let timer = self.pending_timer.take();
        timer
            .into_iter()
            .chain(self.pending_animations.drain(..).map(|(id, _)| id))
            .map(Command::Cancel)
            .collect()
    }

    fn cancel_kind(&mut self, kind: AnimationKind) -> Vec<Command> {
        let mut commands = Vec::new();
        self.pending_animations.retain(|(id, k)| {
            if *k == kind {
                commands.push(Command::Cancel(*id));
                false
            } else {
                true
            }
        });
        commands
    }

    fn accept(&mut self, request: SnackbarRequest) -> Vec<Command> {
        if !request.is_valid() {
            debug!("Ignoring snackbar request {} with empty message", request.id);
            return Vec::new();
        }

        let mut commands = self.cancel_all();
        if let Some(previous) = &self.active {
            info!(
                "Snackbar {} superseded by {}",
                previous.request.id, request.id
            );
        }

        let active = ActiveSnackbar::resolve(request, &self.defaults);
        info!(
            "Showing snackbar {} ({:?}, {}ms hold)",
            active.request.id,
            active.position,
            active.duration.as_millis()
        );

        self.gesture.reset();
        self.exit_due = false;
        commands.push(Command::SetOffset {
            axis: Axis::Drag,
            value: 0.0,
        });
        commands.push(Command::SetOffset {
            axis: Axis::Primary,
            value: active.hidden_offset(),
        });
        let enter = Animation::timing(active.rest_offset(), active.animation_time);
        commands.push(self.animate(AnimationKind::Enter, Axis::Primary, enter));

        self.active = Some(active);
        self.phase = Phase::Entering;
        commands
    }

    fn animation_finished(&mut self, id: HandleId) -> Vec<Command> {
        let Some(index) = self.pending_animations.iter().position(|(h, _)| *h == id) else {
            debug!("Ignoring completion of stale animation {:?}", id);
            return Vec::new();
        };
        let (_, kind) = self.pending_animations.remove(index);

        match (kind, self.phase) {
            (AnimationKind::Enter, Phase::Entering) => {
                let Some(duration) = self.active.as_ref().map(|a| a.duration) else {
                    return Vec::new();
                };
                let timer = self.alloc();
                self.pending_timer = Some(timer);
                self.phase = Phase::Visible;
                debug!("Snackbar visible, holding for {}ms", duration.as_millis());
                vec![Command::ArmTimer {
                    id: timer,
                    after: duration,
                }]
            }
            (AnimationKind::Exit, Phase::Exiting) => {
                let mut commands = self.cancel_all();
                if let Some(done) = self.active.take() {
                    info!("Snackbar {} hidden", done.request.id);
                }
                self.phase = Phase::Idle;
                self.gesture.reset();
                commands.push(Command::SetOffset {
                    axis: Axis::Drag,
                    value: 0.0,
                });
                commands
            }
            _ => Vec::new(),
        }
    }

    fn timer_fired(&mut self, id: HandleId) -> Vec<Command> {
        if self.pending_timer != Some(id) {
            debug!("Ignoring stale timer {:?}", id);
            return Vec::new();
        }
        self.pending_timer = None;

        match self.phase {
            Phase::Visible => self.begin_exit(ExitTrigger::Timeout),
            Phase::DragActive => {
                debug!("Hold time elapsed mid-drag, exiting on release");
                self.exit_due = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn begin_exit(&mut self, trigger: ExitTrigger) -> Vec<Command> {
        let Some(active) = &self.active else {
            return Vec::new();
        };
        let hidden = active.hidden_offset();
        let animation_time = active.animation_time;
        let on_confirm = active.request.on_confirm.clone();

        let mut commands: Vec<Command> = self
            .pending_timer
            .take()
            .map(Command::Cancel)
            .into_iter()
            .collect();
        commands.extend(self.cancel_kind(AnimationKind::Enter));

        if trigger == ExitTrigger::Confirm {
            if let Some(callback) = on_confirm {
                commands.push(Command::InvokeConfirm(callback));
            }
        }

        // A committed swipe already carried the snackbar off-screen.
        let exit = if trigger == ExitTrigger::Swipe {
            Animation::jump(hidden)
        } else {
            Animation::timing(hidden, animation_time)
        };
        commands.push(self.animate(AnimationKind::Exit, Axis::Primary, exit));

        debug!("Snackbar exiting ({:?})", trigger);
        self.gesture.reset();
        self.exit_due = false;
        self.phase = Phase::Exiting;
        commands
    }

    fn start_drag(&mut self, drag_offset: f64) -> Vec<Command> {
        let commands = self.cancel_kind(AnimationKind::SpringBack);
        self.gesture.grant(drag_offset);
        self.phase = Phase::DragActive;
        commands
    }

    fn release_drag(&mut self) -> Vec<Command> {
        let Some(sample) = self.gesture.release() else {
            return Vec::new();
        };

        match sample.decision {
            Some(GestureDecision::Commit) => self.begin_exit(ExitTrigger::Swipe),
            _ => {
                self.phase = Phase::Visible;
                let spring = Animation::spring(0.0, self.defaults.spring);
                let spring_back = self.animate(AnimationKind::SpringBack, Axis::Drag, spring);
                let mut commands = vec![spring_back];
                if self.exit_due {
                    commands.extend(self.begin_exit(ExitTrigger::Timeout));
                }
                commands
            }
        }
    }

    fn dispose(&mut self) -> Vec<Command> {
        let commands = self.cancel_all();
        self.active = None;
        self.phase = Phase::Idle;
        self.gesture.reset();
        self.exit_due = false;
        commands
    }
}
