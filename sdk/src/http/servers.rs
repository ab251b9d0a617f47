//! Server API: SSH server lookup

use crate::errors::ClientError;
use crate::http::client::{decode, ensure_not_empty, KaginawaClient, SERVER_RESOURCE};
use crate::models::SshServer;

impl KaginawaClient {
    /// Get the connection attributes of the SSH server named `hostname`
    pub async fn find_ssh_server_by_hostname(
        &self,
        hostname: &str,
    ) -> Result<SshServer, ClientError> {
        ensure_not_empty("hostname", hostname)?;
        let url = self.resource_url(&[SERVER_RESOURCE, hostname], &[])?;
        let body = self.get(url).await?;
        decode("servers", body)
    }
}
