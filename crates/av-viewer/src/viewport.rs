use crate::error::ViewerError;
use crate::scene::SceneGraph;

/// Lifecycle of the 3D preview, independent of any GPU surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerPhase {
    NoAsset,
    Loading,
    Displayed,
    Error(String),
}

/// Owns the current scene graph and the load lifecycle around it.
///
/// Loads are tagged with a generation counter: starting a new load
/// supersedes any in-flight one, and a completion carrying a stale
/// generation is dropped on the floor. The previous scene graph is
/// released the moment a new load begins, never later.
#[derive(Debug)]
pub struct MeshViewport {
    phase: ViewerPhase,
    generation: u64,
    url: Option<String>,
    scene: Option<SceneGraph>,
}

impl Default for MeshViewport {
    fn default() -> Self {
        Self {
            phase: ViewerPhase::NoAsset,
            generation: 0,
            url: None,
            scene: None,
        }
    }
}

impl MeshViewport {
    pub fn phase(&self) -> &ViewerPhase {
        &self.phase
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    /// Start loading `url`. Returns the generation tag the eventual
    /// completion must carry.
    pub fn begin_load(&mut self, url: impl Into<String>) -> u64 {
        self.generation += 1;
        self.url = Some(url.into());
        self.scene = None;
        self.phase = ViewerPhase::Loading;
        self.generation
    }

    /// Apply a finished load. Returns `true` when the result was applied,
    /// `false` when it belonged to a superseded load.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<SceneGraph, ViewerError>,
    ) -> bool {
        if generation != self.generation || self.phase != ViewerPhase::Loading {
            return false;
        }
        match result {
            Ok(scene) => {
                self.scene = Some(scene);
                self.phase = ViewerPhase::Displayed;
            }
            Err(e) => {
                self.scene = None;
                self.phase = ViewerPhase::Error(e.to_string());
            }
        }
        true
    }

    /// Drop the asset and everything held for it.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.url = None;
        self.scene = None;
        self.phase = ViewerPhase::NoAsset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_support::{LIVE_LOCK, triangle_scene};

    #[test]
    fn test_initial_phase() {
        let viewport = MeshViewport::default();
        assert_eq!(*viewport.phase(), ViewerPhase::NoAsset);
        assert!(viewport.scene().is_none());
    }

    #[test]
    fn test_load_success_path() {
        let _guard = LIVE_LOCK.lock().unwrap();
        let mut viewport = MeshViewport::default();

        let generation = viewport.begin_load("http://api.local/out/model.glb");
        assert_eq!(*viewport.phase(), ViewerPhase::Loading);

        assert!(viewport.finish_load(generation, Ok(triangle_scene())));
        assert_eq!(*viewport.phase(), ViewerPhase::Displayed);
        assert!(viewport.scene().is_some());
    }

    #[test]
    fn test_decode_failure_is_scoped() {
        let mut viewport = MeshViewport::default();
        let generation = viewport.begin_load("http://api.local/out/bad.glb");
        assert!(viewport.finish_load(
            generation,
            Err(ViewerError::Decode("truncated chunk".into()))
        ));
        match viewport.phase() {
            ViewerPhase::Error(msg) => assert!(msg.contains("truncated chunk")),
            other => panic!("expected error phase, got {other:?}"),
        }
        assert!(viewport.scene().is_none());
    }

    #[test]
    fn test_url_change_releases_previous_scene() {
        let _guard = LIVE_LOCK.lock().unwrap();
        let mut viewport = MeshViewport::default();

        let g1 = viewport.begin_load("http://api.local/out/a.glb");
        viewport.finish_load(g1, Ok(triangle_scene()));
        let live_before = SceneGraph::live_count();

        // changing the asset passes through Loading and drops the old graph
        let g2 = viewport.begin_load("http://api.local/out/b.glb");
        assert_eq!(*viewport.phase(), ViewerPhase::Loading);
        assert_eq!(SceneGraph::live_count(), live_before - 1);

        viewport.finish_load(g2, Ok(triangle_scene()));
        assert_eq!(*viewport.phase(), ViewerPhase::Displayed);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let _guard = LIVE_LOCK.lock().unwrap();
        let mut viewport = MeshViewport::default();

        let g1 = viewport.begin_load("http://api.local/out/a.glb");
        let g2 = viewport.begin_load("http://api.local/out/b.glb");

        // the slow first load finishes after the second began
        assert!(!viewport.finish_load(g1, Err(ViewerError::Fetch("timeout".into()))));
        assert_eq!(*viewport.phase(), ViewerPhase::Loading);

        assert!(viewport.finish_load(g2, Ok(triangle_scene())));
        assert_eq!(*viewport.phase(), ViewerPhase::Displayed);
        assert_eq!(viewport.url(), Some("http://api.local/out/b.glb"));
    }

    #[test]
    fn test_clear_releases_everything() {
        let _guard = LIVE_LOCK.lock().unwrap();
        let mut viewport = MeshViewport::default();
        let g = viewport.begin_load("http://api.local/out/a.glb");
        viewport.finish_load(g, Ok(triangle_scene()));
        let live_before = SceneGraph::live_count();

        viewport.clear();
        assert_eq!(*viewport.phase(), ViewerPhase::NoAsset);
        assert_eq!(SceneGraph::live_count(), live_before - 1);
    }
}
