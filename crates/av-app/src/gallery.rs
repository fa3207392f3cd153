use av_core::{RenderOutput, resolve_asset_url};

/// One thumbnail: the full-resolution link plus a decoded preview texture
/// once the download finishes.
pub struct GalleryTile {
    pub url: String,
    pub texture: Option<egui::TextureHandle>,
}

/// Image results for the current render batch, in backend order.
#[derive(Default)]
pub struct Gallery {
    pub batch_id: Option<String>,
    pub tiles: Vec<GalleryTile>,
}

impl Gallery {
    /// Rebuild from a fresh batch. Relative paths are resolved against the
    /// backend base URL; ordering follows the response.
    pub fn reset(&mut self, base_url: &str, output: &RenderOutput) {
        self.batch_id = Some(output.batch_id.clone());
        self.tiles = output
            .images
            .iter()
            .map(|path| GalleryTile {
                url: resolve_asset_url(base_url, path),
                texture: None,
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.batch_id = None;
        self.tiles.clear();
    }

    /// Attach a decoded thumbnail, but only if it belongs to the batch
    /// currently on display.
    pub fn set_texture(&mut self, batch_id: &str, index: usize, texture: egui::TextureHandle) {
        if self.batch_id.as_deref() != Some(batch_id) {
            return;
        }
        if let Some(tile) = self.tiles.get_mut(index) {
            tile.texture = Some(texture);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Decode fetched image bytes into an egui texture image. Runs on a worker
/// thread; only the resulting pixels cross back to the UI thread.
pub fn decode_thumbnail(bytes: &[u8]) -> Option<egui::ColorImage> {
    let img = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_resolves_urls_in_order() {
        let output = RenderOutput {
            batch_id: "b1".into(),
            images: vec!["/out/1.png".into(), "/out/2.png".into()],
            out_dir: "/outputs/b1".into(),
        };

        let mut gallery = Gallery::default();
        gallery.reset("http://api.local", &output);

        assert_eq!(gallery.tiles.len(), 2);
        assert_eq!(gallery.tiles[0].url, "http://api.local/out/1.png");
        assert_eq!(gallery.tiles[1].url, "http://api.local/out/2.png");
    }

    #[test]
    fn test_empty_batch_renders_no_tiles() {
        let output = RenderOutput {
            batch_id: "b2".into(),
            images: vec![],
            out_dir: "/outputs/b2".into(),
        };
        let mut gallery = Gallery::default();
        gallery.reset("http://api.local", &output);
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_clear_drops_batch() {
        let output = RenderOutput {
            batch_id: "b3".into(),
            images: vec!["/out/1.png".into()],
            out_dir: "/outputs/b3".into(),
        };
        let mut gallery = Gallery::default();
        gallery.reset("http://api.local", &output);
        gallery.clear();
        assert!(gallery.is_empty());
        assert_eq!(gallery.batch_id, None);
    }
}
