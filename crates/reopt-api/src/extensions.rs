// Site extension endpoints
//
// Extensions hang off a site and gate optional platform behaviors (the
// tunnel reoptimization marker lives here). Collections are small; no
// paging.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Collection, SiteExtension, SiteExtensionPayload};

impl ApiClient {
    /// List all extensions attached to a site.
    ///
    /// `GET /v2.0/api/tenants/{tenant}/sites/{site_id}/extensions`
    pub async fn list_site_extensions(&self, site_id: &str) -> Result<Vec<SiteExtension>, Error> {
        let url = self.tenant_url("v2.0", &format!("sites/{site_id}/extensions"))?;
        debug!(site_id, "listing site extensions");
        let collection: Collection<SiteExtension> = self.get(url).await?;
        Ok(collection.items)
    }

    /// Create an extension on a site, returning the stored record.
    ///
    /// `POST /v2.0/api/tenants/{tenant}/sites/{site_id}/extensions`
    pub async fn create_site_extension(
        &self,
        site_id: &str,
        payload: &SiteExtensionPayload,
    ) -> Result<SiteExtension, Error> {
        let url = self.tenant_url("v2.0", &format!("sites/{site_id}/extensions"))?;
        debug!(site_id, name = %payload.name, "creating site extension");
        self.post(url, payload).await
    }

    /// Delete an extension by id.
    ///
    /// `DELETE /v2.0/api/tenants/{tenant}/sites/{site_id}/extensions/{extension_id}`
    pub async fn delete_site_extension(
        &self,
        site_id: &str,
        extension_id: &str,
    ) -> Result<(), Error> {
        let url = self.tenant_url(
            "v2.0",
            &format!("sites/{site_id}/extensions/{extension_id}"),
        )?;
        debug!(site_id, extension_id, "deleting site extension");
        self.delete(url).await
    }
}
