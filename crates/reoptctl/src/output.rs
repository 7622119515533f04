//! Operator-facing status lines.
//!
//! One line per site, prefixed `INFO:` or `Error:`. Failures are
//! followed by the controller's diagnostic payload so the operator can
//! see exactly what the API rejected.

use reopt_core::{Action, DesiredState, SiteReport, SiteStatus};

/// The status line for one site report.
pub fn status_line(report: &SiteReport, desired: DesiredState) -> String {
    let name = &report.site.name;
    match &report.status {
        SiteStatus::Disabled => {
            format!("INFO: Tunnel reoptimization is disabled on {name}")
        }
        SiteStatus::AlreadyDisabled { .. } => {
            format!("INFO: Tunnel reoptimization already disabled on {name}")
        }
        SiteStatus::Enabled { .. } => {
            format!("INFO: Tunnel reoptimization is enabled on {name}")
        }
        SiteStatus::AlreadyEnabled => {
            format!("INFO: Tunnel reoptimization is already enabled on {name}")
        }
        SiteStatus::Failed {
            action: Action::Fetch,
            ..
        } => {
            format!("Error: Could not read site extensions on {name}")
        }
        SiteStatus::Failed { .. } => match desired {
            DesiredState::Disabled => {
                format!("Error: Could not set tunnel reoptimization to disabled on {name}")
            }
            DesiredState::Enabled => {
                format!("Error: Could not set tunnel reoptimization to enabled on {name}")
            }
        },
    }
}

/// Detailed diagnostic for a failed site: the error display plus the
/// raw controller payload, pretty-printed when it is JSON.
pub fn failure_detail(status: &SiteStatus) -> Option<String> {
    let SiteStatus::Failed { error, .. } = status else {
        return None;
    };
    let mut out = error.to_string();
    if let Some(detail) = error.detail() {
        out.push('\n');
        out.push_str(&pretty_json(detail));
    }
    Some(out)
}

fn pretty_json(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| raw.to_owned())
}

/// Print one report to stdout.
pub fn print_report(report: &SiteReport, desired: DesiredState) {
    println!("{}", status_line(report, desired));
    if let Some(detail) = failure_detail(&report.status) {
        println!("{detail}");
    }
}
