//! Simulation scenarios driven through the deterministic simulator.
//!
//! Every test runs `AppModel` inside `ProgramSimulator`, sends the same
//! events a user would, and moves virtual time explicitly.
//!
//! # Invariants
//! - Plan with no selection shows every diff and `Plan: 8 to add`.
//! - Plan with a selection shows only that diff and `Plan: 1 to add`.
//! - Apply is offered exactly once per completed plan.
//! - A selection change resets `can_apply` / `has_applied`.
//! - Under the cancel policy, a selection change mid-run drops the
//!   remaining steps; under the finish policy they land.
//!
//! # JSONL Logging
//! ```json
//! {"test":"ec2_plan_apply","check":"plan_text","passed":true,"t_ms":2000}
//! ```
//!
//! Run with: `cargo test -p cloudsim-demo --test simulation_scenarios -- --nocapture`

use std::time::Duration;

use cloudsim_core::event::{Event, KeyCode};
use cloudsim_demo::simulation::{CANCELLED_TEXT, PLAN_INIT_TEXT, PLAN_REFRESH_TEXT};
use cloudsim_demo::{AppConfig, AppModel, Phase, RESOURCES, ResourceId, StalePolicy};
use cloudsim_runtime::{CmdRecord, ProgramSimulator};

fn log_jsonl(test: &str, check: &str, passed: bool, sim: &ProgramSimulator<AppModel>) {
    let line = serde_json::json!({
        "test": test,
        "check": check,
        "passed": passed,
        "t_ms": sim.now().as_millis() as u64,
    });
    eprintln!("{line}");
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn simulator(config: AppConfig) -> ProgramSimulator<AppModel> {
    let mut sim = ProgramSimulator::new(AppModel::new(config));
    sim.init();
    sim
}

fn press(sim: &mut ProgramSimulator<AppModel>, c: char) {
    sim.inject_event(Event::key(KeyCode::Char(c)));
}

fn output(sim: &ProgramSimulator<AppModel>) -> &str {
    sim.model().simulation().output()
}

#[test]
fn ec2_plan_apply() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, '4');
    assert_eq!(sim.model().selected(), ResourceId::find("ec2"));

    press(&mut sim, 'p');
    assert_eq!(output(&sim), PLAN_INIT_TEXT);
    sim.advance(ms(499));
    assert_eq!(output(&sim), PLAN_INIT_TEXT);
    sim.advance(ms(1));
    assert_eq!(output(&sim), PLAN_REFRESH_TEXT);
    sim.advance(ms(1500));

    let text = output(&sim);
    let plan_ok = text.contains("aws_instance.web will be created")
        && text.contains("Plan: 1 to add, 0 to change, 0 to destroy.")
        && !text.contains("aws_vpc.main");
    log_jsonl("ec2_plan_apply", "plan_text", plan_ok, &sim);
    assert!(plan_ok, "{text}");
    assert!(sim.model().simulation().apply_enabled());

    press(&mut sim, 'a');
    assert_eq!(output(&sim), "Executing Plan...\n");
    sim.advance(ms(1000));
    assert_eq!(output(&sim), "Executing Plan...\n\nApplying changes...\n");
    sim.advance(ms(1500));

    let text = output(&sim);
    let apply_ok = text.contains("EC2 Instance: Creation complete!")
        && text.ends_with("Apply complete! Resources: 1 added, 0 changed, 0 destroyed.\n");
    log_jsonl("ec2_plan_apply", "apply_text", apply_ok, &sim);
    assert!(apply_ok, "{text}");
    assert!(!sim.model().simulation().apply_enabled());
    assert_eq!(sim.model().simulation().phase(), Phase::Applied);
    assert_eq!(sim.pending_timers(), 0);
    assert_eq!(
        sim.logs(),
        [
            "plan complete: EC2 Instance, 1 to add",
            "apply complete: EC2 Instance, 1 added"
        ]
    );
}

#[test]
fn plan_without_selection_covers_stack() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, 'p');
    let elapsed = sim.run_until_idle(Duration::from_secs(10));
    assert_eq!(elapsed, ms(2000));

    let text = output(&sim);
    for r in &RESOURCES {
        assert!(text.contains(r.diff), "missing {}", r.id);
    }
    let ok = text.contains("Plan: 8 to add, 0 to change, 0 to destroy.");
    log_jsonl("plan_without_selection_covers_stack", "plan_8", ok, &sim);
    assert!(ok);
}

#[test]
fn apply_gating() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, 'a');
    assert!(!sim.model().simulation().is_running());
    assert_eq!(sim.pending_timers(), 0);

    press(&mut sim, 'p');
    press(&mut sim, 'a');
    assert_eq!(output(&sim), PLAN_INIT_TEXT, "apply ignored while planning");
    sim.run_until_idle(Duration::from_secs(10));

    press(&mut sim, 'a');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(sim.model().simulation().has_applied());
    let before = output(&sim).to_string();
    press(&mut sim, 'a');
    assert_eq!(output(&sim), before, "second apply ignored");

    press(&mut sim, 'p');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(sim.model().simulation().apply_enabled(), "new plan re-enables apply");
}

#[test]
fn plan_ignored_while_running() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, 'p');
    sim.advance(ms(300));
    press(&mut sim, 'p');
    assert_eq!(sim.pending_timers(), 2);
    sim.advance(ms(1700));
    assert!(output(&sim).contains("Plan: 8 to add"));
    assert_eq!(sim.pending_timers(), 0);
}

#[test]
fn selection_change_resets_flags() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, '1');
    press(&mut sim, 'p');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(sim.model().simulation().can_apply());

    press(&mut sim, '2');
    assert!(!sim.model().simulation().can_apply());
    assert!(!sim.model().simulation().has_applied());

    press(&mut sim, 'p');
    sim.run_until_idle(Duration::from_secs(10));
    press(&mut sim, 'a');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(sim.model().simulation().has_applied());
    press(&mut sim, '3');
    assert!(!sim.model().simulation().has_applied());
    assert!(!sim.model().simulation().apply_enabled());
}

#[test]
fn cancel_policy_drops_in_flight_steps() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, '4');
    press(&mut sim, 'p');
    sim.advance(ms(600));
    press(&mut sim, '5');

    assert!(!sim.model().simulation().is_running());
    assert!(output(&sim).ends_with(CANCELLED_TEXT));
    assert_eq!(sim.pending_timers(), 0);
    assert!(sim.command_log().iter().any(|r| matches!(
        r,
        CmdRecord::CancelGroup { dropped: 1, .. }
    )));

    sim.advance(Duration::from_secs(5));
    let ok = !output(&sim).contains("Plan:");
    log_jsonl("cancel_policy_drops_in_flight_steps", "no_late_plan", ok, &sim);
    assert!(ok);

    press(&mut sim, 'p');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(output(&sim).contains("aws_s3_bucket.assets"));
    assert!(!output(&sim).contains("aws_instance.web"));
}

#[test]
fn finish_policy_completes_with_captured_scope() {
    let config = AppConfig {
        stale: StalePolicy::Finish,
        ..AppConfig::default()
    };
    let mut sim = simulator(config);
    press(&mut sim, '4');
    press(&mut sim, 'p');
    sim.advance(ms(600));
    press(&mut sim, '5');
    assert!(sim.model().simulation().is_running());

    sim.run_until_idle(Duration::from_secs(10));
    let text = output(&sim);
    assert!(text.contains("aws_instance.web"));
    assert!(text.contains("Plan: 1 to add"));
    assert!(sim.model().simulation().can_apply());
    assert_eq!(sim.model().selected(), ResourceId::find("s3"));
}

#[test]
fn speed_scales_virtual_time() {
    let config = AppConfig {
        timings: AppConfig::default().timings.scaled(4.0),
        ..AppConfig::default()
    };
    let mut sim = simulator(config);
    press(&mut sim, 'p');
    assert_eq!(sim.run_until_idle(Duration::from_secs(10)), ms(500));
    assert!(output(&sim).contains("Plan: 8 to add"));
}

#[test]
fn initial_selection_from_config() {
    let config = AppConfig {
        initial_selection: ResourceId::find("iam"),
        ..AppConfig::default()
    };
    let mut sim = simulator(config);
    press(&mut sim, 'p');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(output(&sim).contains("aws_iam_role.ec2_s3"));
    press(&mut sim, 'a');
    sim.run_until_idle(Duration::from_secs(10));
    assert!(output(&sim).contains("IAM Role: Creation complete!"));
}

#[test]
fn quit_stops_simulator() {
    let mut sim = simulator(AppConfig::default());
    press(&mut sim, 'p');
    press(&mut sim, 'q');
    assert!(!sim.is_running());
}
