//! Default-environment resolution and caching.

use tracing::{error, info, warn};

use super::WharfClient;
use crate::api::{EnvironmentId, ManagementApi};
use crate::error::{LookupError, Result};

impl<T: ManagementApi> WharfClient<T> {
    /// Resolve the session's target environment id.
    ///
    /// A cached value is returned immediately with no network call.
    /// Otherwise the full environment listing is fetched and the first
    /// entry's id is cached and returned, in the order the server reports
    /// it. This is a deliberate "first available" policy; no sorting or
    /// default-flag inspection is applied.
    ///
    /// Exactly one resolution attempt is made per session unless the cached
    /// value is cleared via [`WharfClient::clear_environment`] or overridden
    /// via [`WharfClient::set_environment`].
    ///
    /// # Errors
    ///
    /// Returns `LookupError::EnvironmentUnresolved` when the listing fetch
    /// fails or reports no environments. Operations depending on an
    /// environment will subsequently fail; the condition is logged here.
    pub async fn resolve_environment(&self) -> Result<EnvironmentId> {
        if let Some(id) = self.cached_environment() {
            return Ok(id);
        }

        let environments = match self.api().list_environments().await {
            Ok(environments) => environments,
            Err(error) => {
                warn!(%error, "environment listing fetch failed");
                return Err(LookupError::EnvironmentUnresolved.into());
            }
        };

        let Some(first) = environments.first() else {
            error!("no environments registered; dependent operations will fail");
            return Err(LookupError::EnvironmentUnresolved.into());
        };

        info!(
            environment_id = first.id,
            name = %first.name,
            "resolved default environment"
        );
        self.store_environment(first.id);
        Ok(first.id)
    }
}
