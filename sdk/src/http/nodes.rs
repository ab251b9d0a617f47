//! Node API: reports, histories and remote commands

use url::form_urlencoded;

use crate::errors::ClientError;
use crate::http::client::{decode, ensure_not_empty, KaginawaClient, NODE_RESOURCE};
use crate::models::Report;

impl KaginawaClient {
    /// List nodes that reported within the last `threshold_min` minutes,
    /// 0 for unlimited.
    ///
    /// Only `id`, `custom_id`, `server_time` and `success` are populated;
    /// every other field of the returned reports keeps its default.
    pub async fn list_alive_nodes(&self, threshold_min: u32) -> Result<Vec<Report>, ClientError> {
        let mut query = vec![("projection", "id".to_string())];
        if threshold_min > 0 {
            query.push(("minutes", threshold_min.to_string()));
        }
        let url = self.resource_url(&[NODE_RESOURCE], &query)?;
        let body = self.get(url).await?;
        decode("nodes", body)
    }

    /// List the newest full reports of every node labelled `custom_id`
    pub async fn list_nodes_by_custom_id(
        &self,
        custom_id: &str,
    ) -> Result<Vec<Report>, ClientError> {
        ensure_not_empty("custom id", custom_id)?;
        let url = self.resource_url(&[NODE_RESOURCE], &[("custom-id", custom_id.to_string())])?;
        let body = self.get(url).await?;
        decode("nodes", body)
    }

    /// Get the newest report of a single node.
    ///
    /// The ID is lower-cased before it goes into the path. An unknown node
    /// comes back as a server error with status 404.
    pub async fn find_node_by_id(&self, id: &str) -> Result<Report, ClientError> {
        ensure_not_empty("id", id)?;
        let id = id.to_lowercase();
        let url = self.resource_url(&[NODE_RESOURCE, id.as_str()], &[])?;
        let body = self.get(url).await?;
        decode("nodes", body)
    }

    /// Execute `command` on a node over its SSH tunnel and return the output.
    ///
    /// `key` and `password` are sent only when non-empty, `timeout_secs` only
    /// when non-zero (0 leaves the server default).
    pub async fn command(
        &self,
        id: &str,
        command: &str,
        user: &str,
        key: Option<&str>,
        password: Option<&str>,
        timeout_secs: u32,
    ) -> Result<String, ClientError> {
        ensure_not_empty("id", id)?;
        ensure_not_empty("command", command)?;
        ensure_not_empty("user", user)?;

        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("command", command);
        form.append_pair("user", user);
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            form.append_pair("key", key);
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            form.append_pair("password", password);
        }
        if timeout_secs > 0 {
            form.append_pair("timeout", &timeout_secs.to_string());
        }

        let id = id.to_lowercase();
        let url = self.resource_url(&[NODE_RESOURCE, id.as_str(), "command"], &[])?;
        self.post_form(url, form.finish()).await
    }

    /// List past reports of a node between `begin` and `end` (epoch seconds,
    /// 0 for unlimited), reduced to the measurement fields.
    ///
    /// Unlike [`KaginawaClient::find_node_by_id`], the ID goes into the path
    /// as given.
    pub async fn list_histories(
        &self,
        id: &str,
        begin: u64,
        end: u64,
    ) -> Result<Vec<Report>, ClientError> {
        ensure_not_empty("id", id)?;
        let mut query = vec![("projection", "measurement".to_string())];
        if begin > 0 {
            query.push(("begin", begin.to_string()));
        }
        if end > 0 {
            query.push(("end", end.to_string()));
        }
        let url = self.resource_url(&[NODE_RESOURCE, id, "histories"], &query)?;
        let body = self.get(url).await?;
        decode("histories", body)
    }
}
