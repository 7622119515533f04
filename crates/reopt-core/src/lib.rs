// reopt-core: decision logic between reopt-api and the CLI.
//
// The resolver turns the operator's --site argument into concrete targets;
// the reconciler converges each target toward the desired reoptimization
// state and yields one report per site.

pub mod error;
pub mod reconcile;
pub mod resolver;

pub use error::CoreError;
pub use reconcile::{
    Action, DesiredState, EXTENSION_ENTITY_ID, EXTENSION_NAME, EXTENSION_NAMESPACE, SiteReport,
    SiteStatus, marker_payload, reconcile_all, reconcile_site,
};
pub use resolver::{ALL_SITES, SiteRef, SiteSelector, fetch_directory, resolve};
