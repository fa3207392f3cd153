use av_core::{JobKind, MeshOutput, MeshParams, RenderOutput, RenderParams, resolve_asset_url};
use log::info;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::multipart::{MultipartPayload, SketchFile, mesh_payload, render_payload};

/// HTTP client for the generation backend.
///
/// One outbound request per submit call; no retries, no de-duplication.
/// Racing submissions are resolved by the caller's result store, not here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend-relative asset path.
    pub fn asset_url(&self, path: &str) -> String {
        resolve_asset_url(&self.base_url, path)
    }

    pub async fn submit_render(
        &self,
        params: &RenderParams,
        sketches: &[SketchFile],
    ) -> Result<RenderOutput, ClientError> {
        let payload = render_payload(params, sketches)?;
        self.submit(JobKind::Render, payload).await
    }

    pub async fn submit_mesh(
        &self,
        params: &MeshParams,
        sketch: &SketchFile,
    ) -> Result<MeshOutput, ClientError> {
        let payload = mesh_payload(params, sketch)?;
        self.submit(JobKind::Mesh, payload).await
    }

    async fn submit<T: DeserializeOwned>(
        &self,
        kind: JobKind,
        payload: MultipartPayload,
    ) -> Result<T, ClientError> {
        let url = self.asset_url(kind.endpoint());
        info!("Submitting {} job to {}", kind.name(), url);

        let response = self
            .http
            .post(&url)
            .multipart(payload.into_form()?)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        decode_json_response(status, &body)
    }

    /// Ping `GET /api/health`.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.asset_url("/api/health");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Backend(format!(
                "health check returned HTTP {}",
                response.status()
            )))
        }
    }

    /// Download a generated asset (thumbnail image, GLB scene, ...).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Backend(format!("HTTP {status} fetching {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Map an HTTP status and raw body to a decoded result.
///
/// Pure so the error taxonomy is testable without a live backend: non-2xx
/// with a structured body surfaces the backend's `detail` verbatim, non-2xx
/// without one gets a generic message, and a 2xx body missing required
/// fields is flagged as malformed rather than trusted.
pub fn decode_json_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, ClientError> {
    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| format!("backend returned HTTP {status}"));
        return Err(ClientError::Backend(detail));
    }

    serde_json::from_slice(body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_detail_round_trip() {
        let err = decode_json_response::<RenderOutput>(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"detail":"out of memory"}"#,
        )
        .unwrap_err();
        assert_eq!(err, ClientError::Backend("out of memory".into()));
        // the UI shows Display output; it must be the detail string exactly
        assert_eq!(err.to_string(), "out of memory");
    }

    #[test]
    fn test_backend_error_without_body() {
        let err =
            decode_json_response::<RenderOutput>(StatusCode::BAD_GATEWAY, b"<html>oops</html>")
                .unwrap_err();
        match err {
            ClientError::Backend(msg) => assert!(msg.contains("502")),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_is_malformed() {
        let err = decode_json_response::<RenderOutput>(StatusCode::OK, br#"{"batch_id":"b1"}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn test_success_decode() {
        let out: MeshOutput = decode_json_response(
            StatusCode::OK,
            br#"{"batch_id":"b","assets":{"glb":"/out/model.glb"}}"#,
        )
        .unwrap();
        assert_eq!(out.glb(), Some("/out/model.glb"));
    }

    #[test]
    fn test_asset_url() {
        let client = ApiClient::new("http://api.local/");
        assert_eq!(client.asset_url("/out/1.png"), "http://api.local/out/1.png");
    }
}
