#![forbid(unsafe_code)]

//! Elm-style program runtime.
//!
//! A [`Model`] owns application state and reacts to messages; [`Cmd`]s
//! describe the side effects it wants (quit, log, timers). [`Program`] runs
//! a model against the real terminal:
//!
//! ```text
//! ┌─────────┐   Event    ┌──────────┐   Cmd    ┌──────────────┐
//! │terminal │ ─────────► │  update  │ ───────► │ timer queue  │
//! └─────────┘            └──────────┘          └──────────────┘
//!      ▲                      │                       │
//!      │   Presenter          ▼ view                  │ due msg
//!      └───────────────── Frame ◄─────────────────────┘
//! ```
//!
//! The loop is single-threaded. Input is polled with a timeout equal to the
//! time until the next timer deadline, so timers need no thread of their
//! own.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use cloudsim_core::event::Event;
use cloudsim_core::terminal_session::{SessionOptions, TerminalSession};
use cloudsim_render::buffer::Buffer;
use cloudsim_render::diff::BufferDiff;
use cloudsim_render::frame::Frame;
use cloudsim_render::presenter::Presenter;
use tracing::{debug, debug_span, info, trace};

use crate::timer::{TimerGroup, TimerQueue};

/// The application state machine.
pub trait Model: Sized {
    /// Messages that drive `update`. Terminal events convert into them.
    type Message: From<Event> + Send + 'static;

    /// Startup commands, run once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply one message and return follow-up effects.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state.
    fn view(&self, frame: &mut Frame);
}

/// Side effects requested by a model.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Stop the program after the current message.
    Quit,
    /// Run several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Deliver a message to the model immediately.
    Msg(M),
    /// Write a line to the log (the UI owns the screen).
    Log(String),
    /// Deliver `msg` after `delay`, tagged with `group` for cancellation.
    Schedule {
        delay: Duration,
        group: TimerGroup,
        msg: M,
    },
    /// Drop every pending timer in the group.
    CancelGroup(TimerGroup),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Schedule { delay, group, msg } => f
                .debug_struct("Schedule")
                .field("delay", delay)
                .field("group", group)
                .field("msg", msg)
                .finish(),
            Self::CancelGroup(g) => f.debug_tuple("CancelGroup").field(g).finish(),
        }
    }
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Combine commands, collapsing empty and single-element batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn schedule(delay: Duration, group: TimerGroup, msg: M) -> Self {
        Self::Schedule { delay, group, msg }
    }

    #[inline]
    pub fn cancel_group(group: TimerGroup) -> Self {
        Self::CancelGroup(group)
    }

    /// Stable name for tracing.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Schedule { .. } => "Schedule",
            Self::CancelGroup(_) => "CancelGroup",
        }
    }
}

/// Runtime options.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Capture mouse clicks.
    pub mouse: bool,
    /// Longest time to block waiting for input when no timer is pending.
    pub poll_interval: Duration,
    /// Quit on its own after this long.
    pub exit_after: Option<Duration>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            poll_interval: Duration::from_millis(250),
            exit_after: None,
        }
    }
}

/// Runs a [`Model`] against the real terminal.
pub struct Program<M: Model> {
    model: M,
    session: TerminalSession,
    presenter: Presenter<Stdout>,
    timers: TimerQueue<M::Message>,
    config: ProgramConfig,
    started: Instant,
    running: bool,
    dirty: bool,
    width: u16,
    height: u16,
    /// Last presented buffer; `None` forces a full repaint.
    previous: Option<Buffer>,
    frame_idx: u64,
}

impl<M: Model> Program<M> {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot enter raw mode or report its size.
    pub fn new(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: true,
            mouse_capture: config.mouse,
        })?;
        let (width, height) = session.size()?;
        info!(width, height, mouse = config.mouse, "program starting");
        Ok(Self {
            model,
            session,
            presenter: Presenter::new(io::stdout()),
            timers: TimerQueue::new(),
            config,
            started: Instant::now(),
            running: true,
            dirty: true,
            width,
            height,
            previous: None,
            frame_idx: 0,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run until the model quits. The terminal is restored when `self` drops.
    pub fn run(&mut self) -> io::Result<()> {
        let cmd = {
            let _span = debug_span!("cloudsim.program.init").entered();
            self.model.init()
        };
        self.execute_cmd(cmd)?;
        self.presenter.clear_screen()?;
        self.render_frame()?;

        while self.running {
            let now = self.started.elapsed();
            if let Some(limit) = self.config.exit_after
                && now >= limit
            {
                info!(elapsed_ms = now.as_millis() as u64, "exit-after limit reached");
                break;
            }

            if self.session.poll_event(self.poll_timeout(now))? {
                loop {
                    if let Some(event) = self.session.read_event()? {
                        self.handle_event(event)?;
                    }
                    if !self.running || !self.session.poll_event(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.fire_due_timers()?;

            if self.dirty && self.running {
                self.render_frame()?;
            }
        }

        info!(frames = self.frame_idx, "program stopped");
        Ok(())
    }

    fn poll_timeout(&self, now: Duration) -> Duration {
        let mut timeout = self.config.poll_interval;
        if let Some(deadline) = self.timers.next_deadline() {
            timeout = timeout.min(deadline.saturating_sub(now));
        }
        if let Some(limit) = self.config.exit_after {
            timeout = timeout.min(limit.saturating_sub(now));
        }
        timeout
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        if let Event::Resize { width, height } = event {
            self.width = width;
            self.height = height;
            self.previous = None;
            self.presenter.clear_screen()?;
        }
        self.dispatch(M::Message::from(event))
    }

    fn fire_due_timers(&mut self) -> io::Result<()> {
        let now = self.started.elapsed();
        while self.running {
            let Some((deadline, msg)) = self.timers.pop_due(now) else {
                break;
            };
            trace!(
                deadline_ms = deadline.as_millis() as u64,
                late_ms = now.saturating_sub(deadline).as_millis() as u64,
                "timer fired"
            );
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: M::Message) -> io::Result<()> {
        let cmd = {
            let _span = debug_span!("cloudsim.program.update").entered();
            self.model.update(msg)
        };
        self.dirty = true;
        self.execute_cmd(cmd)
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) -> io::Result<()> {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => self.dispatch(m)?,
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c)?;
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => info!(target: "cloudsim::model", "{}", text.trim_end()),
            Cmd::Schedule { delay, group, msg } => {
                let now = self.started.elapsed();
                self.timers.schedule(now, delay, group, msg);
            }
            Cmd::CancelGroup(group) => {
                let dropped = self.timers.cancel_group(group);
                debug!(group = group.0, dropped, "timer group cancelled");
            }
        }
        Ok(())
    }

    fn render_frame(&mut self) -> io::Result<()> {
        self.frame_idx = self.frame_idx.wrapping_add(1);
        let mut frame = Frame::new(self.width, self.height);
        self.model.view(&mut frame);
        let buffer = frame.into_buffer();
        let diff = match &self.previous {
            Some(prev) => BufferDiff::compute(prev, &buffer),
            None => BufferDiff::full(&buffer),
        };
        trace!(frame = self.frame_idx, changes = diff.len(), "render");
        self.presenter.present(&buffer, &diff)?;
        self.previous = Some(buffer);
        self.dirty = false;
        Ok(())
    }
}
