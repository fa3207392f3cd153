pub mod job;
pub mod params;

pub use job::{JobKind, MeshOutput, RenderOutput, asset_downloads, resolve_asset_url};
pub use params::{MeshParams, Preprocessor, RenderParams};
