use clap::Parser;
use imbusy::commands::Cli;
use imbusy::startup;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = startup::init_logging(cli.verbose) {
        eprintln!("{:?}", miette::Report::new(e));
        return ExitCode::FAILURE;
    }

    match startup::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            debug!("Command failed: {:?}", e);
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
