use std::path::PathBuf;

use av_client::ClientError;
use av_core::{MeshOutput, MeshParams, RenderOutput, RenderParams};
use av_viewer::{SceneGraph, ViewerError};

use crate::ui::Tab;

/// Top-level user event fed through the winit event loop proxy.
pub enum AvEvent {
    Ui(UiEvent),
    Net(NetEvent),
}

/// Intents raised by the UI panels, applied on the next event-loop turn.
#[derive(Debug, Clone)]
pub enum UiEvent {
    SelectTab(Tab),
    SubmitRender {
        params: RenderParams,
        files: Vec<PathBuf>,
    },
    SubmitMesh {
        params: MeshParams,
        file: PathBuf,
    },
    ResetCamera,
}

/// Completions arriving from spawned network/decode tasks.
///
/// Job completions carry the store sequence number they were submitted
/// under; scene loads carry the viewport generation. Stale tags are
/// dropped by the receiving store/viewport.
pub enum NetEvent {
    Health(Result<(), ClientError>),
    RenderDone {
        seq: u64,
        outcome: Result<RenderOutput, ClientError>,
    },
    MeshDone {
        seq: u64,
        outcome: Result<MeshOutput, ClientError>,
    },
    SceneLoaded {
        generation: u64,
        result: Result<SceneGraph, ViewerError>,
    },
    ThumbnailLoaded {
        batch_id: String,
        index: usize,
        image: egui::ColorImage,
    },
}
