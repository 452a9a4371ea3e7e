#![forbid(unsafe_code)]

//! cloudsim binary.
//!
//! Run with `cargo run -p cloudsim-demo`, or `--script=plan,apply` for a
//! headless transcript.

use std::io::{self, Write};
use std::process;

use cloudsim_demo::cli::{Command, HELP_TEXT, Opts, VERSION};
use cloudsim_demo::logging::{LogMode, LogSettings, init_logging};
use cloudsim_demo::script::run_script;
use cloudsim_demo::{AppConfig, AppModel, RESOURCES, RunError};
use cloudsim_runtime::Program;
use tracing::info;

fn main() {
    let result = Opts::parse()
        .map_err(RunError::from)
        .and_then(run);
    if let Err(e) = result {
        eprintln!("error: {e}");
        if matches!(e, RunError::Config(_)) {
            eprintln!("Run with --help for usage information.");
        }
        process::exit(e.exit_code());
    }
}

fn run(command: Command) -> Result<(), RunError> {
    let opts = match command {
        Command::Help => {
            println!("{HELP_TEXT}");
            return Ok(());
        }
        Command::Version => {
            println!("cloudsim {VERSION}");
            return Ok(());
        }
        Command::List => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &RESOURCES).map_err(io::Error::from)?;
            writeln!(stdout)?;
            return Ok(());
        }
        Command::Run(opts) => opts,
    };

    let config = AppConfig::from(&opts);
    let settings = LogSettings::from_env();

    if let Some(actions) = &opts.script {
        init_logging(&settings, LogMode::Script)?;
        let mut stdout = io::stdout().lock();
        run_script(config, actions, &mut stdout)?;
        return Ok(());
    }

    init_logging(&settings, LogMode::Interactive)?;
    info!(
        version = VERSION,
        speed = opts.speed,
        mouse = config.mouse,
        exit_after_ms = config.exit_after_ms,
        "starting cloudsim"
    );
    let program_config = config.program_config();
    let mut program = Program::new(AppModel::new(config), program_config)?;
    program.run()?;
    info!("cloudsim exited");
    Ok(())
}
