use std::collections::BTreeMap;

use serde::Deserialize;

/// One backend-processing request of a specific kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Render,
    Mesh,
}

impl JobKind {
    /// API endpoint path for this job kind
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Render => "/api/render",
            Self::Mesh => "/api/mesh",
        }
    }

    /// Job name for display in UI
    pub fn name(&self) -> &str {
        match self {
            Self::Render => "Render",
            Self::Mesh => "3D Model",
        }
    }
}

/// Successful response from `/api/render`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderOutput {
    pub batch_id: String,
    /// Relative asset paths, in generation order.
    pub images: Vec<String>,
    /// Server-side output directory, informational only.
    pub out_dir: String,
}

/// Successful response from `/api/mesh`.
///
/// `assets` maps an asset-kind label (`glb`, `obj`, textures, ...) to a
/// relative asset path. The viewer activates on the `glb` entry; everything
/// else is offered as a download.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshOutput {
    pub batch_id: String,
    pub assets: BTreeMap<String, String>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

impl MeshOutput {
    pub fn glb(&self) -> Option<&str> {
        self.assets.get("glb").map(String::as_str)
    }
}

/// Resolve a backend-relative asset path against the backend base URL.
pub fn resolve_asset_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Labelled absolute download links for every asset of a mesh batch, in
/// stable label order.
pub fn asset_downloads(base: &str, output: &MeshOutput) -> Vec<(String, String)> {
    output
        .assets
        .iter()
        .map(|(kind, path)| (kind.clone(), resolve_asset_url(base, path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(JobKind::Render.endpoint(), "/api/render");
        assert_eq!(JobKind::Mesh.endpoint(), "/api/mesh");
    }

    #[test]
    fn test_resolve_asset_url() {
        assert_eq!(
            resolve_asset_url("http://api.local", "/out/1.png"),
            "http://api.local/out/1.png"
        );
        assert_eq!(
            resolve_asset_url("http://api.local/", "/out/1.png"),
            "http://api.local/out/1.png"
        );
        assert_eq!(
            resolve_asset_url("http://api.local", "out/1.png"),
            "http://api.local/out/1.png"
        );
    }

    #[test]
    fn test_render_output_decode() {
        let out: RenderOutput = serde_json::from_str(
            r#"{"batch_id":"b1","images":["/out/1.png","/out/2.png"],"out_dir":"/outputs/b1"}"#,
        )
        .unwrap();
        assert_eq!(out.batch_id, "b1");
        assert_eq!(out.images, vec!["/out/1.png", "/out/2.png"]);
    }

    #[test]
    fn test_mesh_output_decode() {
        // out_dir is optional; the deployed backend sends it, older ones do not
        let out: MeshOutput = serde_json::from_str(
            r#"{"batch_id":"b2","assets":{"glb":"/out/model.glb","obj":"/out/model.obj"}}"#,
        )
        .unwrap();
        assert_eq!(out.glb(), Some("/out/model.glb"));
        assert_eq!(out.assets.len(), 2);
        assert_eq!(out.out_dir, None);
    }

    #[test]
    fn test_asset_downloads_lists_every_label() {
        let out: MeshOutput = serde_json::from_str(
            r#"{"batch_id":"b","assets":{"glb":"/out/model.glb","obj":"/out/model.obj"}}"#,
        )
        .unwrap();
        let downloads = asset_downloads("http://api.local", &out);
        assert_eq!(
            downloads,
            vec![
                ("glb".to_string(), "http://api.local/out/model.glb".to_string()),
                ("obj".to_string(), "http://api.local/out/model.obj".to_string()),
            ]
        );
    }
}
