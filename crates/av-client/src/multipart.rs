use std::fmt::Display;
use std::path::Path;

use av_core::{MeshParams, RenderParams};

use crate::error::ClientError;

/// A sketch image selected by the user, read into memory at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SketchFile {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sketch".to_string());
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }
}

/// A single file part of a multipart payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Transfer-encodable multipart payload.
///
/// Kept as plain field/part lists so tests can inspect exactly what would go
/// on the wire; converted to a `reqwest` form only at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartPayload {
    /// Text fields are rendered through `Display`, which is locale-independent
    /// for all numeric types.
    fn text(&mut self, name: &str, value: impl Display) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    fn attach(&mut self, field: &'static str, sketch: &SketchFile) {
        self.files.push(FilePart {
            field,
            mime: mime_for_name(&sketch.name),
            file_name: sketch.name.clone(),
            bytes: sketch.bytes.clone(),
        });
    }

    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(file.mime)
                .map_err(|e| ClientError::Validation(format!("invalid mime type: {e}")))?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Build the `/api/render` payload. Rejected locally when no sketch is
/// selected; no request leaves the machine on that path.
pub fn render_payload(
    params: &RenderParams,
    sketches: &[SketchFile],
) -> Result<MultipartPayload, ClientError> {
    if sketches.is_empty() {
        return Err(ClientError::Validation(
            "select at least one sketch before submitting".into(),
        ));
    }

    let mut payload = MultipartPayload::default();
    for sketch in sketches {
        payload.attach("files", sketch);
    }
    payload.text("prompt", &params.prompt);
    payload.text("negative_prompt", &params.negative_prompt);
    payload.text("num_images", params.num_images);
    payload.text("guidance_scale", params.guidance_scale);
    payload.text("control_weight", params.control_weight);
    payload.text("preprocessor", params.preprocessor.id());
    if let Some(seed) = params.seed {
        payload.text("seed", seed);
    }

    Ok(payload)
}

/// Build the `/api/mesh` payload. Exactly one source image, under `file`.
pub fn mesh_payload(
    params: &MeshParams,
    sketch: &SketchFile,
) -> Result<MultipartPayload, ClientError> {
    let mut payload = MultipartPayload::default();
    payload.attach("file", sketch);
    payload.text("bake_texture", params.bake_texture);
    payload.text("texture_resolution", params.texture_resolution);
    Ok(payload)
}

/// Guess an image MIME type from the file extension. The backend re-decodes
/// uploads server-side, so a generic fallback is acceptable.
fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::Preprocessor;

    fn sketch(name: &str) -> SketchFile {
        SketchFile {
            name: name.into(),
            bytes: vec![0u8; 4],
        }
    }

    fn field<'a>(payload: &'a MultipartPayload, name: &str) -> &'a str {
        &payload
            .fields
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
            .1
    }

    #[test]
    fn test_render_payload_fields() {
        let params = RenderParams {
            preprocessor: Preprocessor::Canny,
            ..RenderParams::default()
        };
        let payload =
            render_payload(&params, &[sketch("a.png"), sketch("b.jpg")]).unwrap();

        assert_eq!(payload.files.len(), 2);
        assert!(payload.files.iter().all(|f| f.field == "files"));
        assert_eq!(payload.files[0].mime, "image/png");
        assert_eq!(payload.files[1].mime, "image/jpeg");

        assert_eq!(field(&payload, "num_images"), "4");
        assert_eq!(field(&payload, "guidance_scale"), "7.5");
        assert_eq!(field(&payload, "control_weight"), "1");
        assert_eq!(field(&payload, "preprocessor"), "canny");
        // one text field per parameter, seed omitted when unset
        assert_eq!(payload.fields.len(), 6);
    }

    #[test]
    fn test_render_payload_seed() {
        let params = RenderParams {
            seed: Some(42),
            ..RenderParams::default()
        };
        let payload = render_payload(&params, &[sketch("a.png")]).unwrap();
        assert_eq!(field(&payload, "seed"), "42");
    }

    #[test]
    fn test_render_payload_rejects_empty_selection() {
        let err = render_payload(&RenderParams::default(), &[]).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_mesh_payload_fields() {
        let payload = mesh_payload(&MeshParams::default(), &sketch("facade.png")).unwrap();
        assert_eq!(payload.files.len(), 1);
        assert_eq!(payload.files[0].field, "file");
        assert_eq!(field(&payload, "bake_texture"), "true");
        assert_eq!(field(&payload, "texture_resolution"), "1024");
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(mime_for_name("sketch"), "application/octet-stream");
        assert_eq!(mime_for_name("sketch.PNG"), "image/png");
    }
}
