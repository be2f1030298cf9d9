use adb_toolbox::bridge::{Bridge, SystemRunner};
use adb_toolbox::cli::{report_error, resolve_executable, run_session, Args};
use adb_toolbox::config::{Config, UiConfig};
use adb_toolbox::error::{ToolError, EXIT_USER_ABORT};
use adb_toolbox::prompt::Prompter;
use adb_toolbox::session::{is_dumb_terminal, Session, Teardown};
use clap::Parser;
use std::sync::Arc;

/// Run the teardown and exit when Ctrl+C arrives.
///
/// Reading stdin is not interrupted by SIGINT once a handler is installed, so
/// the handler has to end the process itself.
fn setup_ctrlc_handler(teardown: Arc<Teardown>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        println!("\n\n{}", ToolError::UserAbort);
        teardown.run();
        std::process::exit(EXIT_USER_ABORT);
    })
}

fn run(args: &Args, config: &Config, dumb_mode: bool) -> Result<(), ToolError> {
    let executable = resolve_executable(args, config)?;
    let session = Session::new(Bridge::new(SystemRunner::new(executable)), dumb_mode)?;

    if let Err(e) = setup_ctrlc_handler(session.teardown()) {
        log::warn!("Could not set up Ctrl+C handler: {}", e);
    }
    session.start_server()?;

    let mut prompter = Prompter::stdio(session.dumb_mode());
    run_session(session.bridge(), &mut prompter)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let dumb_mode = is_dumb_terminal(std::env::var("TERM").ok().as_deref());

    let (result, pause_on_exit) = match Config::load(args.config.as_deref()) {
        Ok(config) => (run(&args, &config, dumb_mode), config.ui.pause_on_exit),
        Err(e) => (Err(e.into()), UiConfig::default().pause_on_exit),
    };

    let code = match &result {
        Ok(()) => 0,
        Err(e) => {
            if let Err(io_err) = report_error(&mut std::io::stdout(), e) {
                log::debug!("Could not report error: {}", io_err);
            }
            e.exit_code()
        }
    };

    if pause_on_exit {
        if let Err(e) = Prompter::stdio(dumb_mode).pause("\nPress Enter to exit...") {
            log::debug!("Pause on exit failed: {}", e);
        }
    }

    std::process::exit(code);
}
