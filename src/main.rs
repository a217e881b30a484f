//! SGX Historical Data Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sgx_hist_downloader::{
    cli::Args,
    config::{validate_config, Config},
    download::{download_batch, AssumeAnswer, Confirm, JobPhase},
    error::{exit_codes, Error, Result},
    output::{
        config_hint, print_banner, print_error, print_info, print_job_overview,
        print_job_report, print_success, print_warning, ConsolePrompt,
    },
    transfer::HttpTransfer,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if e.is_config() {
                print_info(&config_hint(&args.config));
                return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
            }
            match e {
                Error::Download(_) | Error::NotFound(_) | Error::Timeout(_) | Error::Http(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    // Load configuration
    let config_path = args.config.clone();
    let config_found = config_path.exists();
    let mut config = if config_found {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    // Set up logging
    let log_level = if args.debug {
        "debug".to_string()
    } else {
        config
            .logging
            .level
            .clone()
            .unwrap_or_else(|| "info".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    if !config_found {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
    }

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    let today = chrono::Local::now().date_naive();
    let job = validate_config(&config, today)?;

    print_job_overview(&job);

    let transfer = HttpTransfer::new(job.timeout, !args.quiet)?;
    let confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeAnswer(true))
    } else {
        Box::new(ConsolePrompt::new())
    };

    let state = download_batch(&transfer, &*confirm, &job).await;

    print_job_report(&state);

    if state.phase == JobPhase::Aborted {
        return Ok(());
    }

    if !state.ledger.is_empty() {
        return Err(Error::Download(format!(
            "{} file(s) still failed",
            state.still_failed()
        )));
    }

    print_success("All files downloaded");
    Ok(())
}
