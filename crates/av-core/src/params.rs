/// Unified parameter definitions shared across the application

/// Edge/line-extraction transform applied to the sketch before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preprocessor {
    #[default]
    Lineart,
    Canny,
    None,
}

impl Preprocessor {
    /// Preprocessor ID for API communication
    pub fn id(&self) -> &str {
        match self {
            Self::Lineart => "lineart",
            Self::Canny => "canny",
            Self::None => "none",
        }
    }

    /// Preprocessor name for display in UI
    pub fn name(&self) -> &str {
        match self {
            Self::Lineart => "Line art",
            Self::Canny => "Canny edges",
            Self::None => "None",
        }
    }

    /// All available preprocessors
    pub fn all() -> [Preprocessor; 3] {
        [Self::Lineart, Self::Canny, Self::None]
    }
}

/// Parameters for a render job (sketch -> batch of styled images).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub prompt: String,
    pub negative_prompt: String,
    pub num_images: u32,
    pub guidance_scale: f32,
    pub control_weight: f32,
    pub preprocessor: Preprocessor,
    pub seed: Option<i64>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            prompt: "photorealistic exterior render, global illumination, ultra-detailed, 8k, \
                     award-winning architecture visualization"
                .into(),
            negative_prompt: "people, text, logo, watermark".into(),
            num_images: 4,
            guidance_scale: 7.5,
            control_weight: 1.0,
            preprocessor: Preprocessor::default(),
            seed: None,
        }
    }
}

/// Parameters for a mesh job (single sketch -> rough 3D model).
#[derive(Debug, Clone, PartialEq)]
pub struct MeshParams {
    pub bake_texture: bool,
    pub texture_resolution: u32,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            bake_texture: true,
            texture_resolution: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocessor_ids() {
        assert_eq!(Preprocessor::Lineart.id(), "lineart");
        assert_eq!(Preprocessor::Canny.id(), "canny");
        assert_eq!(Preprocessor::None.id(), "none");
    }

    #[test]
    fn test_all_preprocessors() {
        assert_eq!(Preprocessor::all().len(), 3);
        assert_eq!(Preprocessor::default(), Preprocessor::Lineart);
    }

    #[test]
    fn test_render_defaults() {
        let p = RenderParams::default();
        assert_eq!(p.num_images, 4);
        assert_eq!(p.guidance_scale, 7.5);
        assert_eq!(p.control_weight, 1.0);
        assert_eq!(p.seed, None);
    }

    #[test]
    fn test_mesh_defaults() {
        let p = MeshParams::default();
        assert!(p.bake_texture);
        assert_eq!(p.texture_resolution, 1024);
    }
}
