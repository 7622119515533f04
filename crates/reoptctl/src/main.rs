mod cli;
mod config;
mod error;
mod login;
mod output;

use clap::Parser;
use reopt_api::ApiClient;
use reopt_core::{DesiredState, SiteSelector};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on the debug level
    init_tracing(cli.debug);

    let code = match run(&cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(debug: u8) {
    let filter = match debug {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = config::apply_overrides(config::load_settings_or_default(), cli);
    let client = config::build_client(&settings)?;

    // Login banner.
    println!(
        "{} v{} ({})\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        settings.controller
    );

    let token = config::resolve_token(&settings);
    login::establish_session(
        &client,
        token,
        cli.email.clone(),
        cli.password.clone().map(SecretString::from),
        settings.email.clone(),
    )
    .await?;

    let result = reconcile_run(&client, cli).await;

    // The session is released on every path, success or failure.
    if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "logout failed");
    }

    result
}

async fn reconcile_run(client: &ApiClient, cli: &Cli) -> Result<(), CliError> {
    let desired = if cli.reoptimization {
        DesiredState::Enabled
    } else {
        DesiredState::Disabled
    };

    let directory = reopt_core::fetch_directory(client).await?;
    let selector = SiteSelector::parse(&cli.site);
    let targets = reopt_core::resolve(&directory, &selector);

    if targets.is_empty() {
        println!("No sites found by the name {}", cli.site);
        return Ok(());
    }

    tracing::debug!(targets = targets.len(), ?desired, "starting reconciliation");
    let reports =
        reopt_core::reconcile_all(client, &targets, desired, usize::from(cli.parallel)).await;

    // Per-site failures are reported but do not change the exit code.
    let mut failures = 0_usize;
    for report in &reports {
        output::print_report(report, desired);
        if !report.converged() {
            failures += 1;
        }
    }
    if failures > 0 {
        tracing::warn!(failures, sites = reports.len(), "finished with failures");
    }
    Ok(())
}
