#![forbid(unsafe_code)]

//! Deterministic program simulator.
//!
//! `ProgramSimulator` runs a [`Model`] without a terminal. Events are
//! injected, frames captured as buffers, and time only moves when the
//! caller calls [`advance`](ProgramSimulator::advance), so timed sequences
//! replay identically on every run.
//!
//! ```ignore
//! let mut sim = ProgramSimulator::new(AppModel::new(config));
//! sim.init();
//! sim.inject_event(Event::key(KeyCode::Char('p')));
//! sim.advance(Duration::from_millis(2000));
//! let text = buffer_to_text(&sim.capture_frame(120, 40));
//! ```

use std::time::Duration;

use cloudsim_core::event::Event;
use cloudsim_render::buffer::Buffer;
use cloudsim_render::frame::Frame;

use crate::program::{Cmd, Model};
use crate::timer::{TimerGroup, TimerQueue};

/// Record of a command executed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    Msg,
    Batch(usize),
    Log(String),
    Schedule { at: Duration, group: TimerGroup },
    CancelGroup { group: TimerGroup, dropped: usize },
    /// A scheduled message was delivered.
    Fired { at: Duration },
}

/// Headless driver for a [`Model`] with virtual time.
pub struct ProgramSimulator<M: Model> {
    model: M,
    timers: TimerQueue<M::Message>,
    now: Duration,
    running: bool,
    logs: Vec<String>,
    command_log: Vec<CmdRecord>,
}

impl<M: Model> ProgramSimulator<M> {
    /// The model is not initialized until [`init`](Self::init) is called.
    pub fn new(model: M) -> Self {
        Self {
            model,
            timers: TimerQueue::new(),
            now: Duration::ZERO,
            running: true,
            logs: Vec::new(),
            command_log: Vec::new(),
        }
    }

    /// Call `Model::init()` and execute the returned commands.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute_cmd(cmd);
    }

    /// Feed terminal events through `From<Event>` and `update`.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            if !self.running {
                break;
            }
            self.send(M::Message::from(event.clone()));
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.inject_events(&[event]);
    }

    /// Deliver a message directly.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        let cmd = self.model.update(msg);
        self.execute_cmd(cmd);
    }

    /// Move virtual time forward, firing due timers at their own deadlines.
    ///
    /// Timers scheduled by a firing timer are honored within the same call
    /// if they fall due before the target time.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now.saturating_add(by);
        while self.running {
            let Some((deadline, msg)) = self.timers.pop_due(target) else {
                break;
            };
            self.now = self.now.max(deadline);
            self.command_log.push(CmdRecord::Fired { at: deadline });
            let cmd = self.model.update(msg);
            self.execute_cmd(cmd);
        }
        self.now = target;
    }

    /// Advance until no timers remain, up to `limit` of virtual time.
    ///
    /// Returns the time actually advanced.
    pub fn run_until_idle(&mut self, limit: Duration) -> Duration {
        let start = self.now;
        let end = start.saturating_add(limit);
        while self.running {
            match self.timers.next_deadline() {
                Some(deadline) if deadline <= end => {
                    self.advance(deadline.saturating_sub(self.now));
                }
                _ => break,
            }
        }
        self.now - start
    }

    /// Render the model into a fresh buffer.
    pub fn capture_frame(&mut self, width: u16, height: u16) -> Buffer {
        let mut frame = Frame::new(width, height);
        self.model.view(&mut frame);
        frame.into_buffer()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Current virtual time since start.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Text of every `Cmd::Log` so far.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn command_log(&self) -> &[CmdRecord] {
        &self.command_log
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => self.command_log.push(CmdRecord::None),
            Cmd::Quit => {
                self.running = false;
                self.command_log.push(CmdRecord::Quit);
            }
            Cmd::Msg(m) => {
                self.command_log.push(CmdRecord::Msg);
                let cmd = self.model.update(m);
                self.execute_cmd(cmd);
            }
            Cmd::Batch(cmds) => {
                self.command_log.push(CmdRecord::Batch(cmds.len()));
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => {
                self.command_log.push(CmdRecord::Log(text.clone()));
                self.logs.push(text);
            }
            Cmd::Schedule { delay, group, msg } => {
                self.timers.schedule(self.now, delay, group, msg);
                self.command_log.push(CmdRecord::Schedule {
                    at: self.now.saturating_add(delay),
                    group,
                });
            }
            Cmd::CancelGroup(group) => {
                let dropped = self.timers.cancel_group(group);
                self.command_log.push(CmdRecord::CancelGroup { group, dropped });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsim_core::event::KeyCode;
    use cloudsim_harness::buffer_to_text;

    const BLINK: TimerGroup = TimerGroup(7);

    /// Counts up on `+`, blinks a message after a delay on `b`.
    struct Counter {
        value: i32,
        blinks: Vec<Duration>,
        initialized: bool,
    }

    #[derive(Debug)]
    enum CounterMsg {
        Increment,
        StartBlink,
        Blink(Duration),
        Cancel,
        Quit,
        Ignore,
    }

    impl From<Event> for CounterMsg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('+') => CounterMsg::Increment,
                Event::Key(k) if k.is_char('b') => CounterMsg::StartBlink,
                Event::Key(k) if k.is_char('x') => CounterMsg::Cancel,
                Event::Key(k) if k.is_char('q') => CounterMsg::Quit,
                _ => CounterMsg::Ignore,
            }
        }
    }

    impl Model for Counter {
        type Message = CounterMsg;

        fn init(&mut self) -> Cmd<CounterMsg> {
            self.initialized = true;
            Cmd::log("ready")
        }

        fn update(&mut self, msg: CounterMsg) -> Cmd<CounterMsg> {
            match msg {
                CounterMsg::Increment => {
                    self.value += 1;
                    Cmd::none()
                }
                CounterMsg::StartBlink => Cmd::batch(vec![
                    Cmd::schedule(Duration::from_millis(100), BLINK, CounterMsg::Blink(Duration::from_millis(100))),
                    Cmd::schedule(Duration::from_millis(300), BLINK, CounterMsg::Blink(Duration::from_millis(300))),
                ]),
                CounterMsg::Blink(at) => {
                    self.blinks.push(at);
                    Cmd::none()
                }
                CounterMsg::Cancel => Cmd::cancel_group(BLINK),
                CounterMsg::Quit => Cmd::quit(),
                CounterMsg::Ignore => Cmd::none(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("value={}", self.value);
            let width = frame.width();
            frame.buffer.set_string(0, 0, &text, Default::default(), width);
        }
    }

    fn sim() -> ProgramSimulator<Counter> {
        let mut sim = ProgramSimulator::new(Counter {
            value: 0,
            blinks: Vec::new(),
            initialized: false,
        });
        sim.init();
        sim
    }

    fn key(c: char) -> Event {
        Event::key(KeyCode::Char(c))
    }

    #[test]
    fn init_runs_and_logs() {
        let sim = sim();
        assert!(sim.model().initialized);
        assert_eq!(sim.logs(), ["ready".to_string()]);
    }

    #[test]
    fn events_update_model_and_frame() {
        let mut sim = sim();
        sim.inject_events(&[key('+'), key('+'), key('z')]);
        assert_eq!(sim.model().value, 2);
        let text = buffer_to_text(&sim.capture_frame(10, 1));
        assert_eq!(text, "value=2   ");
    }

    #[test]
    fn timers_fire_only_when_time_advances() {
        let mut sim = sim();
        sim.inject_event(key('b'));
        assert_eq!(sim.pending_timers(), 2);
        sim.advance(Duration::from_millis(99));
        assert!(sim.model().blinks.is_empty());
        sim.advance(Duration::from_millis(1));
        assert_eq!(sim.model().blinks, vec![Duration::from_millis(100)]);
        sim.advance(Duration::from_millis(1000));
        assert_eq!(sim.model().blinks.len(), 2);
        assert_eq!(sim.now(), Duration::from_millis(1100));
    }

    #[test]
    fn cancel_group_drops_pending_timers() {
        let mut sim = sim();
        sim.inject_event(key('b'));
        sim.advance(Duration::from_millis(150));
        sim.inject_event(key('x'));
        sim.advance(Duration::from_secs(5));
        assert_eq!(sim.model().blinks, vec![Duration::from_millis(100)]);
        assert!(sim.command_log().contains(&CmdRecord::CancelGroup {
            group: BLINK,
            dropped: 1
        }));
    }

    #[test]
    fn run_until_idle_stops_at_last_deadline() {
        let mut sim = sim();
        sim.inject_event(key('b'));
        let spent = sim.run_until_idle(Duration::from_secs(10));
        assert_eq!(spent, Duration::from_millis(300));
        assert_eq!(sim.pending_timers(), 0);
    }

    #[test]
    fn quit_stops_processing() {
        let mut sim = sim();
        sim.inject_events(&[key('q'), key('+')]);
        assert!(!sim.is_running());
        assert_eq!(sim.model().value, 0);
    }
}
