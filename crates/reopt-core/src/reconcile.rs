// ── Tunnel reoptimization reconciler ──
//
// Reoptimization is controlled per site by a marker extension: a site
// extension named `TunnelManager` whose conf carries
// `disable_reopt: true`. Marker present means reoptimization is
// disabled; absent means enabled. Both directions scan the full
// extension list, so stray duplicate markers are cleaned up on either
// pass: enabling deletes every marker, disabling keeps exactly one.
//
// Reconciliation never aborts the run. Each site produces a
// `SiteReport`; failures are captured in the report with the action
// that failed and the controller's diagnostic.

use futures_util::{StreamExt, stream};
use reopt_api::ApiClient;
use reopt_api::models::{ExtensionConf, SiteExtension, SiteExtensionPayload};
use tracing::debug;

use crate::error::CoreError;
use crate::resolver::SiteRef;

/// Name of the marker extension.
pub const EXTENSION_NAME: &str = "TunnelManager";
/// Namespace the marker is created under.
pub const EXTENSION_NAMESPACE: &str = "tunnelmgr/tunnelreopt";
/// Entity id the marker is created with.
pub const EXTENSION_ENTITY_ID: &str = "4501";

/// Target state for tunnel reoptimization on a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    Enabled,
    Disabled,
}

/// The controller operation that was in flight when a site failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Create,
    Delete,
}

/// Outcome of reconciling one site.
#[derive(Debug)]
pub enum SiteStatus {
    /// Marker created; reoptimization is now disabled.
    Disabled,
    /// Marker was already present. `pruned` counts surplus duplicates
    /// removed along the way.
    AlreadyDisabled { pruned: usize },
    /// Markers removed; reoptimization is now enabled.
    Enabled { removed: usize },
    /// No marker was present.
    AlreadyEnabled,
    /// The site could not be converged.
    Failed { action: Action, error: CoreError },
}

/// Per-site result of a reconciliation run.
#[derive(Debug)]
pub struct SiteReport {
    pub site: SiteRef,
    pub status: SiteStatus,
}

impl SiteReport {
    /// Whether the site ended up in the desired state.
    pub fn converged(&self) -> bool {
        !matches!(self.status, SiteStatus::Failed { .. })
    }
}

/// The extension payload that disables tunnel reoptimization.
pub fn marker_payload() -> SiteExtensionPayload {
    SiteExtensionPayload {
        name: EXTENSION_NAME.to_owned(),
        namespace: EXTENSION_NAMESPACE.to_owned(),
        entity_id: EXTENSION_ENTITY_ID.to_owned(),
        disabled: false,
        conf: ExtensionConf {
            disable_reopt: true,
            ..ExtensionConf::default()
        },
    }
}

/// An extension counts as a marker on name plus `disable_reopt` in its
/// conf. Extensions named `TunnelManager` for other purposes are left
/// alone.
fn is_marker(ext: &SiteExtension) -> bool {
    ext.name == EXTENSION_NAME && ext.conf.as_ref().is_some_and(|c| c.disable_reopt)
}

fn marker_ids(extensions: &[SiteExtension]) -> Vec<String> {
    extensions
        .iter()
        .filter(|e| is_marker(e))
        .map(|e| e.id.clone())
        .collect()
}

/// Drive one site to the desired state. Never returns `Err`; failures
/// are folded into the report.
pub async fn reconcile_site(
    client: &ApiClient,
    site: &SiteRef,
    desired: DesiredState,
) -> SiteReport {
    let status = converge(client, site, desired).await;
    SiteReport {
        site: site.clone(),
        status,
    }
}

async fn converge(client: &ApiClient, site: &SiteRef, desired: DesiredState) -> SiteStatus {
    let extensions = match client.list_site_extensions(&site.id).await {
        Ok(extensions) => extensions,
        Err(e) => {
            return SiteStatus::Failed {
                action: Action::Fetch,
                error: e.into(),
            };
        }
    };
    let markers = marker_ids(&extensions);
    debug!(
        site = %site.name,
        markers = markers.len(),
        extensions = extensions.len(),
        "scanned site extensions"
    );
    match desired {
        DesiredState::Disabled => disable(client, site, &markers).await,
        DesiredState::Enabled => enable(client, site, &markers).await,
    }
}

async fn disable(client: &ApiClient, site: &SiteRef, markers: &[String]) -> SiteStatus {
    let Some((_keep, surplus)) = markers.split_first() else {
        return match client.create_site_extension(&site.id, &marker_payload()).await {
            Ok(created) => {
                debug!(site = %site.name, extension_id = %created.id, "marker created");
                SiteStatus::Disabled
            }
            Err(e) => SiteStatus::Failed {
                action: Action::Create,
                error: e.into(),
            },
        };
    };
    // Marker already present; prune duplicates down to one.
    for id in surplus {
        if let Err(e) = client.delete_site_extension(&site.id, id).await {
            return SiteStatus::Failed {
                action: Action::Delete,
                error: e.into(),
            };
        }
        debug!(site = %site.name, extension_id = %id, "pruned duplicate marker");
    }
    SiteStatus::AlreadyDisabled {
        pruned: surplus.len(),
    }
}

async fn enable(client: &ApiClient, site: &SiteRef, markers: &[String]) -> SiteStatus {
    if markers.is_empty() {
        return SiteStatus::AlreadyEnabled;
    }
    for id in markers {
        if let Err(e) = client.delete_site_extension(&site.id, id).await {
            return SiteStatus::Failed {
                action: Action::Delete,
                error: e.into(),
            };
        }
        debug!(site = %site.name, extension_id = %id, "marker removed");
    }
    SiteStatus::Enabled {
        removed: markers.len(),
    }
}

/// Reconcile a batch of sites with bounded parallelism and return the
/// reports sorted by site name.
pub async fn reconcile_all(
    client: &ApiClient,
    targets: &[SiteRef],
    desired: DesiredState,
    parallelism: usize,
) -> Vec<SiteReport> {
    let mut reports: Vec<SiteReport> = stream::iter(targets)
        .map(|site| reconcile_site(client, site, desired))
        .buffer_unordered(parallelism.max(1))
        .collect()
        .await;
    reports.sort_by(|a, b| a.site.name.cmp(&b.site.name));
    reports
}
