//! Clap derive structures for the `reoptctl` CLI.
//!
//! Kept free of non-clap imports so build.rs can include this file
//! directly for man page generation.

use clap::Parser;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// reoptctl -- toggle tunnel reoptimization on controller-managed sites
#[derive(Debug, Parser)]
#[command(
    name = "reoptctl",
    version,
    about = "Enable or disable tunnel reoptimization per site",
    long_about = "Converges the TunnelManager extension on one or every SPOKE site\n\
        so that tunnel reoptimization matches the requested state.\n\n\
        Without --reoptimization the feature is disabled (a disabling extension\n\
        is created); with it the feature is enabled (the extension is removed)."
)]
pub struct Cli {
    /// Site name, or the literal "All-Sites" for every SPOKE site
    #[arg(long, short = 's')]
    pub site: String,

    /// Enable tunnel reoptimization (default is to disable it)
    #[arg(long, short = 'r')]
    pub reoptimization: bool,

    /// Controller URI, e.g. https://api.elcapitan.cloudgenix.com
    #[arg(long, short = 'c', env = "REOPTCTL_CONTROLLER")]
    pub controller: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "REOPTCTL_INSECURE")]
    pub insecure: bool,

    /// Use this email as user name instead of prompting
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Use this password instead of prompting
    #[arg(long = "pass", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Verbose debug output, levels 0-2
    #[arg(
        long,
        short = 'd',
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub debug: u8,

    /// Maximum concurrent site operations
    #[arg(
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..=64)
    )]
    pub parallel: u16,

    /// Request timeout in seconds
    #[arg(long, env = "REOPTCTL_TIMEOUT")]
    pub timeout: Option<u64>,
}
