pub mod camera;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod viewport;

pub use camera::OrbitCamera;
pub use error::ViewerError;
pub use renderer::MeshRenderer;
pub use scene::{SceneGraph, decode_glb};
pub use viewport::{MeshViewport, ViewerPhase};
