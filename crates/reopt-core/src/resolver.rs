// ── Site resolution ──
//
// Turns the operator's site argument into the concrete set of branch
// sites to act on. Only SPOKE-role sites are eligible; hubs and sites
// with no cluster role are skipped. Name matching is exact and
// case-sensitive, and the `All-Sites` sentinel selects every eligible
// site on the tenant.

use reopt_api::ApiClient;
use reopt_api::models::{ClusterRole, Site};
use tracing::debug;

use crate::error::CoreError;

/// Sentinel site name that selects every eligible site.
pub const ALL_SITES: &str = "All-Sites";

/// Parsed form of the operator's `--site` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelector {
    /// Every SPOKE site on the tenant.
    All,
    /// A single site, matched exactly by name.
    Named(String),
}

impl SiteSelector {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SITES {
            SiteSelector::All
        } else {
            SiteSelector::Named(raw.to_owned())
        }
    }
}

/// Minimal handle for a resolved site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRef {
    pub id: String,
    pub name: String,
}

/// Fetch the tenant's site directory.
pub async fn fetch_directory(client: &ApiClient) -> Result<Vec<Site>, CoreError> {
    Ok(client.list_sites().await?)
}

/// Select the sites the selector names, restricted to SPOKE sites.
///
/// An empty result is not an error; the caller decides how to report
/// it.
pub fn resolve(sites: &[Site], selector: &SiteSelector) -> Vec<SiteRef> {
    let refs: Vec<SiteRef> = sites
        .iter()
        .filter(|site| site.element_cluster_role == Some(ClusterRole::Spoke))
        .filter(|site| match selector {
            SiteSelector::All => true,
            SiteSelector::Named(name) => site.name == *name,
        })
        .map(|site| SiteRef {
            id: site.id.clone(),
            name: site.name.clone(),
        })
        .collect();
    debug!(count = refs.len(), ?selector, "resolved sites");
    refs
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn site(id: &str, name: &str, role: Option<ClusterRole>) -> Site {
        Site {
            id: id.into(),
            name: name.into(),
            element_cluster_role: role,
            admin_state: None,
            description: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(SiteSelector::parse("All-Sites"), SiteSelector::All);
        assert_eq!(
            SiteSelector::parse("Branch-1"),
            SiteSelector::Named("Branch-1".into())
        );
        // Near-misses of the sentinel are ordinary names.
        assert_eq!(
            SiteSelector::parse("all-sites"),
            SiteSelector::Named("all-sites".into())
        );
    }

    #[test]
    fn test_resolve_named_spoke() {
        let sites = vec![
            site("s1", "NYC", Some(ClusterRole::Spoke)),
            site("s2", "SFO", Some(ClusterRole::Spoke)),
        ];
        let refs = resolve(&sites, &SiteSelector::Named("NYC".into()));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, "s1");
        assert_eq!(refs[0].name, "NYC");
    }

    #[test]
    fn test_resolve_excludes_hub_even_on_exact_name() {
        let sites = vec![site("s1", "NYC", Some(ClusterRole::Hub))];
        let refs = resolve(&sites, &SiteSelector::Named("NYC".into()));
        assert!(refs.is_empty());
    }

    #[test]
    fn test_resolve_all_selects_every_spoke() {
        let sites = vec![
            site("s1", "NYC", Some(ClusterRole::Spoke)),
            site("s2", "DC-Hub", Some(ClusterRole::Hub)),
            site("s3", "SFO", Some(ClusterRole::Spoke)),
            site("s4", "LAB", Some(ClusterRole::Other("EXPERIMENTAL".into()))),
        ];
        let refs = resolve(&sites, &SiteSelector::All);
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["NYC", "SFO"]);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let sites = vec![site("s1", "NYC", Some(ClusterRole::Spoke))];
        let refs = resolve(&sites, &SiteSelector::Named("nyc".into()));
        assert!(refs.is_empty());
    }

    #[test]
    fn test_resolve_duplicate_names_returns_both() {
        let sites = vec![
            site("s1", "Branch", Some(ClusterRole::Spoke)),
            site("s2", "Branch", Some(ClusterRole::Spoke)),
        ];
        let refs = resolve(&sites, &SiteSelector::Named("Branch".into()));
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].id, "s1");
        assert_eq!(refs[1].id, "s2");
    }

    #[test]
    fn test_resolve_missing_role_is_ineligible() {
        let sites = vec![site("s1", "NYC", None)];
        assert!(resolve(&sites, &SiteSelector::All).is_empty());
        assert!(resolve(&sites, &SiteSelector::Named("NYC".into())).is_empty());
    }
}
