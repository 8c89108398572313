//! Console entry point for the transaction reversal demo.
//!
//! # Responsibility
//! - Open the default store, run the flow against stdout, close the store.
//! - Map any fatal failure to a non-zero exit code.

use std::io;
use std::process::ExitCode;
use txdemo_core::{
    default_log_level, init_logging, run_transaction_flow, DataContext, FlowError, StoreConfig,
};

fn main() -> ExitCode {
    let log_dir = std::env::temp_dir().join("txdemo").join("logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        // Logging is diagnostics only; the flow still runs without it.
        eprintln!("warning: {err}");
    }

    match run(&StoreConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=app_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &StoreConfig) -> Result<(), FlowError> {
    let mut context = DataContext::open(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_transaction_flow(&mut context, &mut out)?;
    log::info!("event=app_exit module=cli status=ok outcome={outcome:?}");
    context.close()?;
    Ok(())
}
