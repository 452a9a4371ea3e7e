#![forbid(unsafe_code)]

//! Scripted Terraform runs.
//!
//! [`SimulationState`] is a small state machine over
//! `Idle → Planning → Planned → Applying → Applied`. Starting an action does
//! not schedule anything; it returns [`Effect`]s (a step plus a delay) that
//! the caller turns into runtime timers. When a timer fires, the step comes
//! back through [`SimulationState::apply_step`] together with the [`RunId`]
//! it was issued for, so steps from an abandoned run can be recognized and
//! dropped.
//!
//! # Invariants
//!
//! - `running` is true exactly in `Planning` and `Applying`.
//! - A run never starts while another is running.
//! - Apply is only offered after a completed plan and at most once per plan.

use std::fmt;
use std::time::Duration;

use cloudsim_runtime::TimerGroup;
use tracing::debug;

use crate::catalog::{RESOURCES, ResourceId};

/// Timer group for every pending simulation step.
pub const SIMULATION_GROUP: TimerGroup = TimerGroup(1);

pub const PLAN_INIT_TEXT: &str = "Initializing Terraform...\n";
pub const PLAN_REFRESH_TEXT: &str = "Initializing Terraform...\n\nRefreshing state...\n";
pub const APPLY_INIT_TEXT: &str = "Executing Plan...\n";
pub const APPLY_PROGRESS_TEXT: &str = "\nApplying changes...\n";
pub const CANCELLED_TEXT: &str = "\nRun cancelled: selection changed.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Planning,
    Planned,
    Applying,
    Applied,
}

/// What a plan covered, and therefore what its apply reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanScope {
    Single(ResourceId),
    Stack,
}

impl PlanScope {
    pub fn from_selection(selection: Option<ResourceId>) -> Self {
        selection.map_or(Self::Stack, Self::Single)
    }

    /// Resource name, or `Stack` for the whole catalog.
    pub fn label(self) -> &'static str {
        match self {
            Self::Single(id) => id.resource().name,
            Self::Stack => "Stack",
        }
    }

    pub fn count(self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Stack => RESOURCES.len(),
        }
    }
}

/// Full text shown when a plan completes.
pub fn plan_output(scope: PlanScope) -> String {
    let mut out = String::from("\nTerraform will perform the following actions:\n\n");
    match scope {
        PlanScope::Single(id) => {
            out.push_str(id.resource().diff);
            out.push('\n');
        }
        PlanScope::Stack => {
            for r in &RESOURCES {
                out.push_str(r.diff);
                out.push('\n');
            }
        }
    }
    out.push_str(&format!(
        "Plan: {} to add, 0 to change, 0 to destroy.\n",
        scope.count()
    ));
    out
}

/// Text appended when an apply completes.
pub fn apply_summary(scope: PlanScope) -> String {
    format!(
        "\n{}: Creation complete!\n\nApply complete! Resources: {} added, 0 changed, 0 destroyed.\n",
        scope.label(),
        scope.count()
    )
}

/// Identifies one started sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RunId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Plan,
    Apply,
}

impl Action {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Apply => "apply",
        }
    }

    /// Title of the terminal window.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Plan => "terraform plan",
            Self::Apply => "terraform apply",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PlanRefresh,
    PlanComplete,
    ApplyProgress,
    ApplyComplete,
}

impl Step {
    /// Phase the run must be in for this step to land.
    const fn expected_phase(self) -> Phase {
        match self {
            Self::PlanRefresh | Self::PlanComplete => Phase::Planning,
            Self::ApplyProgress | Self::ApplyComplete => Phase::Applying,
        }
    }
}

/// A step to deliver after `delay`, measured from when the run started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub delay: Duration,
    pub run: RunId,
    pub step: Step,
}

/// Slowest accepted time scale. At this speed the longest delay is
/// still well under an hour.
pub const MIN_SPEED: f64 = 1e-3;

/// Delays of the scripted steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTimings {
    pub plan_refresh: Duration,
    pub plan_complete: Duration,
    pub apply_progress: Duration,
    pub apply_complete: Duration,
}

impl Default for SimTimings {
    fn default() -> Self {
        Self {
            plan_refresh: Duration::from_millis(500),
            plan_complete: Duration::from_millis(2000),
            apply_progress: Duration::from_millis(1000),
            apply_complete: Duration::from_millis(2500),
        }
    }
}

impl SimTimings {
    /// Divide every delay by `speed`. Non-positive or non-finite speeds
    /// leave the timings unchanged, as does any delay that would not fit
    /// in a `Duration` once scaled.
    #[must_use]
    pub fn scaled(self, speed: f64) -> Self {
        if !(speed.is_finite() && speed > 0.0) {
            return self;
        }
        let scale =
            |d: Duration| Duration::try_from_secs_f64(d.as_secs_f64() / speed).unwrap_or(d);
        Self {
            plan_refresh: scale(self.plan_refresh),
            plan_complete: scale(self.plan_complete),
            apply_progress: scale(self.apply_progress),
            apply_complete: scale(self.apply_complete),
        }
    }

    /// Total length of a plan plus an apply.
    pub fn total(&self) -> Duration {
        self.plan_complete + self.apply_complete
    }
}

/// What happens to a running sequence when the selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Stop the run and discard its remaining steps.
    #[default]
    Cancel,
    /// Let the run finish with the text captured when it started.
    Finish,
}

impl StalePolicy {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Finish => "finish",
        }
    }
}

/// Why a trigger was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    Running,
    NothingPlanned,
    AlreadyApplied,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "a run is already in progress"),
            Self::NothingPlanned => write!(f, "no completed plan to apply"),
            Self::AlreadyApplied => write!(f, "plan was already applied"),
        }
    }
}

impl std::error::Error for Rejected {}

/// Result of delivering a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Output changed; the run continues.
    Progress,
    /// The run ended.
    Finished(Action),
    /// The step belonged to an abandoned run and was ignored.
    Stale,
}

/// Result of a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Flags were reset; any running sequence keeps going.
    Reset,
    /// The running sequence was stopped.
    Cancelled(RunId),
}

#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    phase: Phase,
    running: bool,
    output: String,
    can_apply: bool,
    has_applied: bool,
    planned: Option<PlanScope>,
    in_flight: Option<PlanScope>,
    run: RunId,
    last_action: Option<Action>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn can_apply(&self) -> bool {
        self.can_apply
    }

    pub fn has_applied(&self) -> bool {
        self.has_applied
    }

    /// Scope of the last completed plan, if it is still current.
    pub fn planned(&self) -> Option<PlanScope> {
        self.planned
    }

    /// Id of the most recently started run.
    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn plan_enabled(&self) -> bool {
        !self.running
    }

    pub fn apply_enabled(&self) -> bool {
        self.can_apply && !self.running && !self.has_applied
    }

    /// Start a plan for the current selection (the whole stack when empty).
    pub fn start_plan(
        &mut self,
        selection: Option<ResourceId>,
        timings: &SimTimings,
    ) -> Result<Vec<Effect>, Rejected> {
        if self.running {
            return Err(Rejected::Running);
        }
        let scope = PlanScope::from_selection(selection);
        let run = self.next_run();
        self.running = true;
        self.has_applied = false;
        self.can_apply = false;
        self.output = PLAN_INIT_TEXT.to_string();
        self.phase = Phase::Planning;
        self.in_flight = Some(scope);
        self.last_action = Some(Action::Plan);
        debug!(run = run.0, scope = scope.label(), "plan started");

        Ok(vec![
            Effect {
                delay: timings.plan_refresh,
                run,
                step: Step::PlanRefresh,
            },
            Effect {
                delay: timings.plan_complete,
                run,
                step: Step::PlanComplete,
            },
        ])
    }

    /// Apply the last completed plan.
    pub fn start_apply(&mut self, timings: &SimTimings) -> Result<Vec<Effect>, Rejected> {
        if self.running {
            return Err(Rejected::Running);
        }
        if self.has_applied {
            return Err(Rejected::AlreadyApplied);
        }
        let scope = match self.planned {
            Some(scope) if self.can_apply => scope,
            _ => return Err(Rejected::NothingPlanned),
        };
        let run = self.next_run();
        self.running = true;
        self.output = APPLY_INIT_TEXT.to_string();
        self.phase = Phase::Applying;
        self.in_flight = Some(scope);
        self.last_action = Some(Action::Apply);
        debug!(run = run.0, scope = scope.label(), "apply started");

        Ok(vec![
            Effect {
                delay: timings.apply_progress,
                run,
                step: Step::ApplyProgress,
            },
            Effect {
                delay: timings.apply_complete,
                run,
                step: Step::ApplyComplete,
            },
        ])
    }

    /// Deliver a step issued for `run`.
    pub fn apply_step(&mut self, run: RunId, step: Step) -> StepOutcome {
        if run != self.run || !self.running || self.phase != step.expected_phase() {
            debug!(run = run.0, current = self.run.0, ?step, "stale step dropped");
            return StepOutcome::Stale;
        }
        let Some(scope) = self.in_flight else {
            return StepOutcome::Stale;
        };
        debug!(run = run.0, ?step, "step");

        match step {
            Step::PlanRefresh => {
                self.output = PLAN_REFRESH_TEXT.to_string();
                StepOutcome::Progress
            }
            Step::PlanComplete => {
                self.output = plan_output(scope);
                self.running = false;
                self.can_apply = true;
                self.phase = Phase::Planned;
                self.planned = Some(scope);
                self.in_flight = None;
                StepOutcome::Finished(Action::Plan)
            }
            Step::ApplyProgress => {
                self.output.push_str(APPLY_PROGRESS_TEXT);
                StepOutcome::Progress
            }
            Step::ApplyComplete => {
                self.output.push_str(&apply_summary(scope));
                self.running = false;
                self.can_apply = false;
                self.has_applied = true;
                self.phase = Phase::Applied;
                self.in_flight = None;
                StepOutcome::Finished(Action::Apply)
            }
        }
    }

    /// React to the user picking a different resource.
    pub fn on_selection_change(&mut self, policy: StalePolicy) -> SelectionOutcome {
        self.can_apply = false;
        self.has_applied = false;

        if self.running {
            if policy == StalePolicy::Finish {
                debug!(run = self.run.0, "selection changed, run continues");
                return SelectionOutcome::Reset;
            }
            let cancelled = self.run;
            self.next_run();
            self.running = false;
            self.phase = Phase::Idle;
            self.in_flight = None;
            self.planned = None;
            self.output.push_str(CANCELLED_TEXT);
            debug!(run = cancelled.0, "run cancelled by selection change");
            return SelectionOutcome::Cancelled(cancelled);
        }

        if matches!(self.phase, Phase::Planned | Phase::Applied) {
            self.phase = Phase::Idle;
        }
        self.planned = None;
        SelectionOutcome::Reset
    }

    fn next_run(&mut self) -> RunId {
        self.run = RunId(self.run.0.wrapping_add(1));
        self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ec2() -> ResourceId {
        ResourceId::find("ec2").expect("ec2")
    }

    fn finish_plan(state: &mut SimulationState, selection: Option<ResourceId>) {
        let effects = state
            .start_plan(selection, &SimTimings::default())
            .expect("plan");
        for e in effects {
            state.apply_step(e.run, e.step);
        }
    }

    #[test]
    fn plan_emits_two_timed_steps() {
        let mut state = SimulationState::new();
        let effects = state
            .start_plan(None, &SimTimings::default())
            .expect("plan");
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].delay, Duration::from_millis(500));
        assert_eq!(effects[0].step, Step::PlanRefresh);
        assert_eq!(effects[1].delay, Duration::from_millis(2000));
        assert_eq!(effects[1].step, Step::PlanComplete);
        assert!(state.is_running());
        assert_eq!(state.phase(), Phase::Planning);
        assert_eq!(state.output(), PLAN_INIT_TEXT);
    }

    #[test]
    fn refresh_replaces_output() {
        let mut state = SimulationState::new();
        let effects = state
            .start_plan(None, &SimTimings::default())
            .expect("plan");
        assert_eq!(state.apply_step(effects[0].run, Step::PlanRefresh), StepOutcome::Progress);
        assert_eq!(state.output(), PLAN_REFRESH_TEXT);
    }

    #[test]
    fn single_plan_has_one_diff() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, Some(ec2()));
        let out = state.output();
        assert!(out.starts_with("\nTerraform will perform the following actions:\n\n"));
        assert!(out.contains("aws_instance.web will be created"));
        assert!(!out.contains("aws_vpc.main"));
        assert!(out.ends_with("Plan: 1 to add, 0 to change, 0 to destroy.\n"));
        assert!(state.apply_enabled());
        assert_eq!(state.planned(), Some(PlanScope::Single(ec2())));
    }

    #[test]
    fn stack_plan_has_every_diff_in_order() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, None);
        let out = state.output();
        let mut last = 0;
        for r in &RESOURCES {
            let at = out.find(r.diff).expect("diff present");
            assert!(at >= last, "{} out of order", r.id);
            last = at;
        }
        assert!(out.contains("Plan: 8 to add, 0 to change, 0 to destroy."));
    }

    #[test]
    fn rejects_plan_while_running() {
        let mut state = SimulationState::new();
        state
            .start_plan(None, &SimTimings::default())
            .expect("plan");
        assert_eq!(
            state.start_plan(None, &SimTimings::default()),
            Err(Rejected::Running)
        );
        assert_eq!(
            state.start_apply(&SimTimings::default()),
            Err(Rejected::Running)
        );
    }

    #[test]
    fn apply_requires_plan() {
        let mut state = SimulationState::new();
        assert_eq!(
            state.start_apply(&SimTimings::default()),
            Err(Rejected::NothingPlanned)
        );
        assert!(!state.apply_enabled());
    }

    #[test]
    fn apply_runs_once_per_plan() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, Some(ec2()));
        let effects = state.start_apply(&SimTimings::default()).expect("apply");
        assert_eq!(state.output(), APPLY_INIT_TEXT);
        assert_eq!(effects[0].delay, Duration::from_millis(1000));
        assert_eq!(effects[1].delay, Duration::from_millis(2500));
        for e in effects {
            state.apply_step(e.run, e.step);
        }
        assert!(state.output().ends_with(
            "\nEC2 Instance: Creation complete!\n\nApply complete! Resources: 1 added, 0 changed, 0 destroyed.\n"
        ));
        assert!(state.output().starts_with("Executing Plan...\n\nApplying changes...\n"));
        assert!(state.has_applied());
        assert!(!state.can_apply());
        assert_eq!(state.phase(), Phase::Applied);
        assert_eq!(
            state.start_apply(&SimTimings::default()),
            Err(Rejected::AlreadyApplied)
        );
    }

    #[test]
    fn stack_apply_reports_stack() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, None);
        for e in state.start_apply(&SimTimings::default()).expect("apply") {
            state.apply_step(e.run, e.step);
        }
        assert!(state.output().contains("Stack: Creation complete!"));
        assert!(state.output().contains("Resources: 8 added"));
    }

    #[test]
    fn selection_change_resets_flags() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, Some(ec2()));
        assert_eq!(
            state.on_selection_change(StalePolicy::Cancel),
            SelectionOutcome::Reset
        );
        assert!(!state.can_apply());
        assert!(!state.has_applied());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.planned(), None);
        assert!(state.output().contains("Plan: 1 to add"));
    }

    #[test]
    fn cancel_policy_stops_run_and_drops_steps() {
        let mut state = SimulationState::new();
        let effects = state
            .start_plan(Some(ec2()), &SimTimings::default())
            .expect("plan");
        let old = effects[0].run;
        assert_eq!(
            state.on_selection_change(StalePolicy::Cancel),
            SelectionOutcome::Cancelled(old)
        );
        assert!(!state.is_running());
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.output().ends_with(CANCELLED_TEXT));
        for e in effects {
            assert_eq!(state.apply_step(e.run, e.step), StepOutcome::Stale);
        }
        assert!(!state.can_apply());
        assert!(state.plan_enabled());
    }

    #[test]
    fn finish_policy_keeps_captured_scope() {
        let mut state = SimulationState::new();
        let effects = state
            .start_plan(Some(ec2()), &SimTimings::default())
            .expect("plan");
        assert_eq!(
            state.on_selection_change(StalePolicy::Finish),
            SelectionOutcome::Reset
        );
        assert!(state.is_running());
        for e in effects {
            state.apply_step(e.run, e.step);
        }
        assert!(state.output().contains("aws_instance.web"));
        assert!(state.output().contains("Plan: 1 to add"));
        assert!(state.can_apply());
    }

    #[test]
    fn plan_after_apply_clears_has_applied() {
        let mut state = SimulationState::new();
        finish_plan(&mut state, None);
        for e in state.start_apply(&SimTimings::default()).expect("apply") {
            state.apply_step(e.run, e.step);
        }
        finish_plan(&mut state, None);
        assert!(!state.has_applied());
        assert!(state.apply_enabled());
    }

    #[test]
    fn out_of_phase_step_is_stale() {
        let mut state = SimulationState::new();
        let effects = state
            .start_plan(None, &SimTimings::default())
            .expect("plan");
        assert_eq!(
            state.apply_step(effects[0].run, Step::ApplyComplete),
            StepOutcome::Stale
        );
        assert!(state.is_running());
    }

    #[test]
    fn timings_scale() {
        let fast = SimTimings::default().scaled(2.0);
        assert_eq!(fast.plan_refresh, Duration::from_millis(250));
        assert_eq!(fast.apply_complete, Duration::from_millis(1250));
        assert_eq!(SimTimings::default().scaled(0.0), SimTimings::default());
        assert_eq!(SimTimings::default().scaled(f64::NAN), SimTimings::default());
        assert_eq!(SimTimings::default().scaled(1e-300), SimTimings::default());
        let slow = SimTimings::default().scaled(MIN_SPEED);
        assert!((slow.apply_complete.as_secs_f64() - 2500.0).abs() < 1e-6);
        assert_eq!(SimTimings::default().total(), Duration::from_millis(4500));
    }

    #[test]
    fn rejected_messages() {
        assert_eq!(Rejected::Running.to_string(), "a run is already in progress");
        assert_eq!(Action::Apply.title(), "terraform apply");
        assert_eq!(StalePolicy::default(), StalePolicy::Cancel);
    }
}
