//! Media host collaborator.
//!
//! Upload handling itself is out of scope; the catalog only stores
//! `{url, external_id}` references and asks the host to delete replaced
//! media best-effort.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stayhub_common::{AppError, AppResult};

/// A hosted media reference as stored in the catalog's json columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    pub url: String,
    pub external_id: String,
}

/// External media host.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload a file, returning its public URL and host-assigned ID.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<MediaReference>;

    /// Delete a previously uploaded file by its host-assigned ID.
    async fn delete(&self, external_id: &str) -> AppResult<()>;
}

/// Media host used when none is configured.
#[derive(Clone, Default)]
pub struct NoopMediaHost;

#[async_trait]
impl MediaHost for NoopMediaHost {
    async fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> AppResult<MediaReference> {
        Err(AppError::ExternalService(
            "Media host not configured".to_string(),
        ))
    }

    async fn delete(&self, external_id: &str) -> AppResult<()> {
        tracing::debug!(external_id = external_id, "No media host configured, skipping delete");
        Ok(())
    }
}

/// Delete a set of media references, logging failures instead of
/// propagating them.
pub async fn delete_media_best_effort(host: &dyn MediaHost, refs: &[MediaReference]) {
    for media in refs {
        if let Err(e) = host.delete(&media.external_id).await {
            tracing::warn!(
                external_id = %media.external_id,
                error = %e,
                "Failed to delete old media"
            );
        }
    }
}

/// Parse the json media column into references, tolerating legacy shapes.
#[must_use]
pub fn parse_media_refs(value: &serde_json::Value) -> Vec<MediaReference> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_refs() {
        let value = serde_json::json!([
            {"url": "https://cdn.example.com/a.jpg", "externalId": "a1"},
        ]);
        let refs = parse_media_refs(&value);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].external_id, "a1");
    }

    #[test]
    fn test_parse_media_refs_tolerates_garbage() {
        assert!(parse_media_refs(&serde_json::json!("oops")).is_empty());
    }

    #[tokio::test]
    async fn test_noop_delete_is_ok() {
        let host = NoopMediaHost;
        assert!(host.delete("anything").await.is_ok());
    }
}
