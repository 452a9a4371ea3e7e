//! Timers that schedule further timers, driven through the simulator.
//!
//! # Invariants
//! - A timer scheduled while another fires is honored in the same
//!   `advance` when it falls due before the target.
//! - Cancelling one group leaves other groups untouched.
//! - `Cmd::Msg` is dispatched synchronously, before the next event.

use std::time::Duration;

use cloudsim_core::event::{Event, KeyCode};
use cloudsim_harness::buffer_to_text;
use cloudsim_render::frame::Frame;
use cloudsim_runtime::{Cmd, CmdRecord, Model, ProgramSimulator, TimerGroup};

const TICK: TimerGroup = TimerGroup(1);
const ALARM: TimerGroup = TimerGroup(2);

/// Counts down one step per 100ms tick, with an independent alarm.
#[derive(Default)]
struct Countdown {
    remaining: u32,
    fired: Vec<&'static str>,
}

#[derive(Debug)]
enum Msg {
    Start(u32),
    Tick,
    Alarm,
    StopTicks,
    Echo(&'static str),
    Ignore,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(k) if k.is_char('s') => Msg::Start(3),
            Event::Key(k) if k.is_char('x') => Msg::StopTicks,
            Event::Key(k) if k.is_char('e') => Msg::Echo("echo"),
            _ => Msg::Ignore,
        }
    }
}

impl Model for Countdown {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Start(n) => {
                self.remaining = n;
                Cmd::batch(vec![
                    Cmd::schedule(Duration::from_millis(100), TICK, Msg::Tick),
                    Cmd::schedule(Duration::from_millis(250), ALARM, Msg::Alarm),
                ])
            }
            Msg::Tick => {
                self.fired.push("tick");
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    Cmd::log("done")
                } else {
                    Cmd::schedule(Duration::from_millis(100), TICK, Msg::Tick)
                }
            }
            Msg::Alarm => {
                self.fired.push("alarm");
                Cmd::none()
            }
            Msg::StopTicks => Cmd::cancel_group(TICK),
            Msg::Echo(text) => {
                self.fired.push(text);
                if text == "echo" {
                    Cmd::msg(Msg::Echo("reply"))
                } else {
                    Cmd::none()
                }
            }
            Msg::Ignore => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let text = format!("remaining={}", self.remaining);
        let width = frame.width();
        frame.buffer.set_string(0, 0, &text, Default::default(), width);
    }
}

fn sim() -> ProgramSimulator<Countdown> {
    let mut sim = ProgramSimulator::new(Countdown::default());
    sim.init();
    sim
}

fn key(c: char) -> Event {
    Event::key(KeyCode::Char(c))
}

#[test]
fn chained_ticks_fire_within_one_advance() {
    let mut sim = sim();
    sim.inject_event(key('s'));
    sim.advance(Duration::from_millis(1000));

    assert_eq!(sim.model().fired, ["tick", "tick", "alarm", "tick"]);
    assert_eq!(sim.model().remaining, 0);
    assert_eq!(sim.logs(), ["done"]);
    assert_eq!(sim.pending_timers(), 0);
    assert_eq!(sim.now(), Duration::from_millis(1000));

    let fired_at: Vec<_> = sim
        .command_log()
        .iter()
        .filter_map(|r| match r {
            CmdRecord::Fired { at } => Some(at.as_millis()),
            _ => None,
        })
        .collect();
    assert_eq!(fired_at, [100, 200, 250, 300]);
}

#[test]
fn cancelling_ticks_keeps_alarm() {
    let mut sim = sim();
    sim.inject_event(key('s'));
    sim.advance(Duration::from_millis(150));
    sim.inject_event(key('x'));

    assert!(sim.command_log().iter().any(|r| matches!(
        r,
        CmdRecord::CancelGroup { group: TICK, dropped: 1 }
    )));
    let idle = sim.run_until_idle(Duration::from_secs(5));
    assert_eq!(idle, Duration::from_millis(100));
    assert_eq!(sim.model().fired, ["tick", "alarm"]);
    assert_eq!(sim.model().remaining, 2);
}

#[test]
fn run_until_idle_respects_limit() {
    let mut sim = sim();
    sim.inject_event(key('s'));
    let advanced = sim.run_until_idle(Duration::from_millis(120));
    assert_eq!(advanced, Duration::from_millis(100));
    assert_eq!(sim.pending_timers(), 2);
}

#[test]
fn msg_commands_dispatch_immediately() {
    let mut sim = sim();
    sim.inject_event(key('e'));
    assert_eq!(sim.model().fired, ["echo", "reply"]);
    assert!(sim.command_log().contains(&CmdRecord::Msg));
}

#[test]
fn frame_reflects_timer_progress() {
    let mut sim = sim();
    sim.inject_event(key('s'));
    let before = buffer_to_text(&sim.capture_frame(20, 1));
    sim.advance(Duration::from_millis(200));
    let after = buffer_to_text(&sim.capture_frame(20, 1));
    assert!(before.starts_with("remaining=3"));
    assert!(after.starts_with("remaining=1"));
}
