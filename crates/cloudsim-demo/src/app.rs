#![forbid(unsafe_code)]

//! The application model.
//!
//! `AppModel` holds the selection, the simulation state, and a little view
//! state (help overlay, output scroll). Terminal events arrive as
//! [`AppMsg::Key`] / [`AppMsg::Mouse`] and are translated into intent
//! messages (`Select`, `Plan`, `Apply`, ...) inside `update`, so tests can
//! send either.

use cloudsim_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use cloudsim_render::frame::Frame;
use cloudsim_runtime::{Cmd, Model};
use tracing::{debug, info, trace};

use crate::catalog::{RESOURCES, ResourceId};
use crate::config::AppConfig;
use crate::simulation::{
    Action, Effect, Rejected, RunId, SIMULATION_GROUP, SelectionOutcome, SimulationState, Step,
    StepOutcome,
};
use crate::theme::spacing;
use crate::views::{self, HitRegions, HitTarget};

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMsg {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    Select(ResourceId),
    Plan,
    Apply,
    /// The destroy button is never enabled; the message is logged and ignored.
    Destroy,
    Step { run: RunId, step: Step },
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToTail,
    ToggleHelp,
    Quit,
    Noop,
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Self::Key(key),
            Event::Mouse(mouse) => Self::Mouse(mouse),
            Event::Resize { width, height } => Self::Resize { width, height },
            Event::Focus(_) => Self::Noop,
        }
    }
}

pub struct AppModel {
    config: AppConfig,
    selected: Option<ResourceId>,
    sim: SimulationState,
    /// Lines above the tail of the output; 0 follows new output.
    scroll_back: u16,
    show_help: bool,
    last_rejected: Option<Rejected>,
    hits: HitRegions,
}

impl AppModel {
    pub fn new(config: AppConfig) -> Self {
        Self {
            selected: config.initial_selection,
            config,
            sim: SimulationState::new(),
            scroll_back: 0,
            show_help: false,
            last_rejected: None,
            hits: HitRegions::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<ResourceId> {
        self.selected
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.sim
    }

    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Why the most recent Plan/Apply trigger was ignored, if it was.
    pub fn last_rejected(&self) -> Option<Rejected> {
        self.last_rejected
    }

    /// Layout recorded by the last `view`.
    pub fn hits(&self) -> &HitRegions {
        &self.hits
    }

    fn on_key(&self, key: KeyEvent) -> AppMsg {
        if !key.is_press() {
            return AppMsg::Noop;
        }
        if key.ctrl() && key.is_char('c') {
            return AppMsg::Quit;
        }
        if self.show_help {
            return match key.code {
                KeyCode::Char('q') => AppMsg::Quit,
                _ => AppMsg::ToggleHelp,
            };
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Escape => AppMsg::Quit,
            KeyCode::Char('?') => AppMsg::ToggleHelp,
            KeyCode::Char('p') => AppMsg::Plan,
            KeyCode::Char('a') => AppMsg::Apply,
            KeyCode::Char('d') => AppMsg::Destroy,
            KeyCode::Char(c @ '1'..='8') => {
                let index = c as usize - '1' as usize;
                ResourceId::new(index).map_or(AppMsg::Noop, AppMsg::Select)
            }
            KeyCode::Left | KeyCode::Char('h') => self.moved(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.moved(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.moved(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.moved(0, 1),
            KeyCode::PageUp => AppMsg::ScrollUp(self.page()),
            KeyCode::PageDown => AppMsg::ScrollDown(self.page()),
            KeyCode::Home => AppMsg::ScrollUp(u16::MAX),
            KeyCode::End => AppMsg::ScrollToTail,
            _ => AppMsg::Noop,
        }
    }

    fn on_mouse(&self, mouse: MouseEvent) -> AppMsg {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.show_help {
                    return AppMsg::ToggleHelp;
                }
                match self.hits.hit_test(mouse.x, mouse.y) {
                    Some(HitTarget::Card(id)) => AppMsg::Select(id),
                    Some(HitTarget::Plan) => AppMsg::Plan,
                    Some(HitTarget::Apply) => AppMsg::Apply,
                    Some(HitTarget::Destroy) => AppMsg::Destroy,
                    Some(HitTarget::Output) | None => AppMsg::Noop,
                }
            }
            MouseEventKind::ScrollUp if self.hits.over_output(mouse.x, mouse.y) => {
                AppMsg::ScrollUp(WHEEL_STEP)
            }
            MouseEventKind::ScrollDown if self.hits.over_output(mouse.x, mouse.y) => {
                AppMsg::ScrollDown(WHEEL_STEP)
            }
            _ => AppMsg::Noop,
        }
    }

    /// Selection after moving `dx` columns and `dy` rows in the grid.
    fn moved(&self, dx: i32, dy: i32) -> AppMsg {
        let Some(current) = self.selected else {
            return ResourceId::new(0).map_or(AppMsg::Noop, AppMsg::Select);
        };
        let columns = match self.hits.grid_columns.get() {
            0 => spacing::GRID_COLUMNS,
            n => n,
        };
        let index = current.index() as i32 + dx + dy * i32::from(columns);
        if index < 0 || index as usize >= RESOURCES.len() {
            return AppMsg::Noop;
        }
        ResourceId::new(index as usize).map_or(AppMsg::Noop, AppMsg::Select)
    }

    fn page(&self) -> u16 {
        self.hits.output.get().height.saturating_sub(1).max(1)
    }

    /// Largest useful `scroll_back` for the last rendered output area.
    fn max_scroll(&self) -> u16 {
        let area = self.hits.output.get();
        let lines = views::terraform_panel::output_lines(self, area.width);
        lines.saturating_sub(usize::from(area.height)).min(usize::from(u16::MAX)) as u16
    }

    fn select(&mut self, id: ResourceId) -> Cmd<AppMsg> {
        if self.selected == Some(id) {
            return Cmd::none();
        }
        self.selected = Some(id);
        debug!(resource = id.resource().id, "selected");
        match self.sim.on_selection_change(self.config.stale) {
            SelectionOutcome::Reset => Cmd::none(),
            SelectionOutcome::Cancelled(run) => {
                self.scroll_back = 0;
                Cmd::batch(vec![
                    Cmd::cancel_group(SIMULATION_GROUP),
                    Cmd::log(format!("run {} cancelled: selection changed", run.0)),
                ])
            }
        }
    }

    fn start(&mut self, action: Action) -> Cmd<AppMsg> {
        let timings = self.config.timings;
        let started = match action {
            Action::Plan => self.sim.start_plan(self.selected, &timings),
            Action::Apply => self.sim.start_apply(&timings),
        };
        match started {
            Ok(effects) => {
                self.last_rejected = None;
                self.scroll_back = 0;
                Cmd::batch(effects.into_iter().map(schedule).collect())
            }
            Err(reason) => {
                debug!(action = action.name(), %reason, "trigger ignored");
                self.last_rejected = Some(reason);
                Cmd::none()
            }
        }
    }

    fn step(&mut self, run: RunId, step: Step) -> Cmd<AppMsg> {
        match self.sim.apply_step(run, step) {
            StepOutcome::Stale => {
                trace!(run = run.0, ?step, "stale step");
                Cmd::none()
            }
            StepOutcome::Progress => {
                self.scroll_back = 0;
                Cmd::none()
            }
            StepOutcome::Finished(action) => {
                self.scroll_back = 0;
                let count = self.sim.planned().map_or(0, |scope| scope.count());
                let label = self.sim.planned().map_or("Stack", |scope| scope.label());
                match action {
                    Action::Plan => Cmd::log(format!("plan complete: {label}, {count} to add")),
                    Action::Apply => Cmd::log(format!("apply complete: {label}, {count} added")),
                }
            }
        }
    }
}

fn schedule(effect: Effect) -> Cmd<AppMsg> {
    Cmd::schedule(
        effect.delay,
        SIMULATION_GROUP,
        AppMsg::Step {
            run: effect.run,
            step: effect.step,
        },
    )
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<AppMsg> {
        info!(
            env = %self.config.env,
            region = %self.config.region,
            stale = self.config.stale.name(),
            selected = self.selected.map(|id| id.resource().id),
            "cloudsim ready"
        );
        Cmd::none()
    }

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        match msg {
            AppMsg::Key(key) => {
                let next = self.on_key(key);
                self.update(next)
            }
            AppMsg::Mouse(mouse) => {
                let next = self.on_mouse(mouse);
                self.update(next)
            }
            AppMsg::Resize { width, height } => {
                debug!(width, height, "resize");
                Cmd::none()
            }
            AppMsg::Select(id) => self.select(id),
            AppMsg::Plan => self.start(Action::Plan),
            AppMsg::Apply => self.start(Action::Apply),
            AppMsg::Destroy => {
                debug!("destroy is disabled");
                Cmd::none()
            }
            AppMsg::Step { run, step } => self.step(run, step),
            AppMsg::ScrollUp(n) => {
                self.scroll_back = self.scroll_back.saturating_add(n).min(self.max_scroll());
                Cmd::none()
            }
            AppMsg::ScrollDown(n) => {
                self.scroll_back = self.scroll_back.saturating_sub(n);
                Cmd::none()
            }
            AppMsg::ScrollToTail => {
                self.scroll_back = 0;
                Cmd::none()
            }
            AppMsg::ToggleHelp => {
                self.show_help = !self.show_help;
                Cmd::none()
            }
            AppMsg::Quit => {
                info!("quit requested");
                Cmd::quit()
            }
            AppMsg::Noop => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        views::render(self, frame);
    }
}
