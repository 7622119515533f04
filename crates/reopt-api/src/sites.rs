// Tenant site endpoints
//
// The site directory is tenant-scoped and small enough to fetch in one
// call; the `v4.5` collection endpoint has no paging.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Collection, Site};

impl ApiClient {
    /// List every site in the tenant, in directory order.
    ///
    /// `GET /v4.5/api/tenants/{tenant}/sites`
    pub async fn list_sites(&self) -> Result<Vec<Site>, Error> {
        let url = self.tenant_url("v4.5", "sites")?;
        debug!("listing sites");
        let collection: Collection<Site> = self.get(url).await?;
        Ok(collection.items)
    }
}
