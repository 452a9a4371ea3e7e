#![forbid(unsafe_code)]

//! Headless runs.
//!
//! Drives [`AppModel`] through the [`ProgramSimulator`] with virtual time and
//! writes what the terminal panel would have shown. Nothing waits on the
//! wall clock, so a full plan and apply finishes immediately.

use std::io::{self, Write};
use std::time::Duration;

use cloudsim_runtime::ProgramSimulator;
use tracing::{info, warn};

use crate::app::{AppModel, AppMsg};
use crate::config::AppConfig;
use crate::simulation::Action;

/// Run `actions` in order and write a transcript to `out`.
///
/// Each action prints `$ terraform <action>` followed by the final output.
/// A trigger the model rejects prints `Error: <reason>` instead.
pub fn run_script<W: Write>(config: AppConfig, actions: &[Action], out: &mut W) -> io::Result<()> {
    let limit = config.timings.total() + Duration::from_secs(1);
    let mut sim = ProgramSimulator::new(AppModel::new(config));
    sim.init();

    for (index, action) in actions.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "$ {}", action.title())?;
        sim.send(match action {
            Action::Plan => AppMsg::Plan,
            Action::Apply => AppMsg::Apply,
        });
        if let Some(reason) = sim.model().last_rejected() {
            warn!(action = action.name(), %reason, "script step rejected");
            writeln!(out, "Error: {reason}")?;
            continue;
        }
        let elapsed = sim.run_until_idle(limit);
        info!(
            action = action.name(),
            virtual_ms = elapsed.as_millis() as u64,
            "script step finished"
        );
        write!(out, "{}", sim.model().simulation().output())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceId;

    fn transcript(config: AppConfig, actions: &[Action]) -> String {
        let mut out = Vec::new();
        run_script(config, actions, &mut out).expect("script");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn plan_prints_stack_diff() {
        let text = transcript(AppConfig::default(), &[Action::Plan]);
        assert!(text.starts_with("$ terraform plan\n"));
        assert!(text.contains("aws_internet_gateway.main"));
        assert!(text.ends_with("Plan: 8 to add, 0 to change, 0 to destroy.\n"));
    }

    #[test]
    fn plan_then_apply_for_selection() {
        let config = AppConfig {
            initial_selection: ResourceId::find("s3"),
            ..AppConfig::default()
        };
        let text = transcript(config, &[Action::Plan, Action::Apply]);
        assert!(text.contains("Plan: 1 to add"));
        assert!(text.contains("\n$ terraform apply\nExecuting Plan...\n"));
        assert!(text.ends_with(
            "S3 Bucket: Creation complete!\n\nApply complete! Resources: 1 added, 0 changed, 0 destroyed.\n"
        ));
    }

    #[test]
    fn apply_without_plan_is_an_error_line() {
        let text = transcript(AppConfig::default(), &[Action::Apply]);
        assert_eq!(text, "$ terraform apply\nError: no completed plan to apply\n");
    }
}
