use std::path::PathBuf;

use av_core::{MeshParams, Preprocessor, RenderParams};
use egui::{Color32, Context, RichText, TextEdit, Ui};

use crate::events::UiEvent;
use crate::store::JobPhase;
use crate::ui::{Tab, UiEventSender, UiView};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Job submission forms. The panel owns the in-progress form state; the
/// submit events carry a snapshot of it, so a request is never mutated
/// after construction.
pub struct SidePanel {
    pub render_params: RenderParams,
    pub render_files: Vec<PathBuf>,
    pub use_seed: bool,
    pub seed: i64,

    pub mesh_params: MeshParams,
    pub mesh_file: Option<PathBuf>,
}

impl Default for SidePanel {
    fn default() -> Self {
        Self {
            render_params: RenderParams::default(),
            render_files: Vec::new(),
            use_seed: false,
            seed: 0,
            mesh_params: MeshParams::default(),
            mesh_file: None,
        }
    }
}

impl SidePanel {
    pub fn show(&mut self, ctx: &Context, sender: &mut UiEventSender, view: &UiView<'_>) {
        egui::SidePanel::left("side_panel")
            .default_width(340.0)
            .show(ctx, |ui| match view.tab {
                Tab::Render => self.show_render_form(ui, sender, view),
                Tab::Mesh => self.show_mesh_form(ui, sender, view),
            });
    }

    fn show_render_form(&mut self, ui: &mut Ui, sender: &mut UiEventSender, view: &UiView<'_>) {
        ui.heading(RichText::new("✏ Sketches").size(16.0));
        ui.add_space(5.0);

        if ui.button("📁 Select sketches...").clicked() {
            if let Some(paths) = rfd::FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_files()
            {
                self.render_files = paths;
            }
        }
        self.show_selection(ui, Tab::Render);

        ui.separator();

        // === Prompt ===
        ui.heading(RichText::new("✨ Prompt").size(16.0));
        ui.add_space(5.0);
        ui.add(
            TextEdit::multiline(&mut self.render_params.prompt)
                .desired_width(f32::INFINITY)
                .desired_rows(3),
        );
        ui.add(
            TextEdit::singleline(&mut self.render_params.negative_prompt)
                .desired_width(f32::INFINITY)
                .hint_text("negative prompt"),
        );

        ui.add_space(5.0);

        // === Parameters ===
        egui::Grid::new("render_params").num_columns(2).show(ui, |ui| {
            ui.label("Images per sketch");
            ui.add(egui::DragValue::new(&mut self.render_params.num_images).range(1..=8));
            ui.end_row();

            ui.label("Guidance scale");
            ui.add(
                egui::DragValue::new(&mut self.render_params.guidance_scale)
                    .speed(0.5)
                    .range(1.0..=20.0),
            );
            ui.end_row();

            ui.label("Control weight");
            ui.add(
                egui::DragValue::new(&mut self.render_params.control_weight)
                    .speed(0.1)
                    .range(0.0..=2.0),
            );
            ui.end_row();

            ui.label("Preprocessor");
            egui::ComboBox::from_id_salt("preprocessor")
                .selected_text(self.render_params.preprocessor.name())
                .show_ui(ui, |ui| {
                    for p in Preprocessor::all() {
                        ui.selectable_value(&mut self.render_params.preprocessor, p, p.name());
                    }
                });
            ui.end_row();

            ui.label("Fixed seed");
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.use_seed, "");
                if self.use_seed {
                    ui.add(egui::DragValue::new(&mut self.seed));
                }
            });
            ui.end_row();
        });

        ui.add_space(8.0);

        let pending = matches!(view.render_phase, JobPhase::Pending);
        let button = ui.add_enabled(
            !pending && !self.render_files.is_empty(),
            egui::Button::new(RichText::new("🎨 Generate renders").size(14.0))
                .min_size(egui::vec2(ui.available_width(), 30.0)),
        );
        if button.clicked() {
            let mut params = self.render_params.clone();
            params.seed = self.use_seed.then_some(self.seed);
            sender.instant(UiEvent::SubmitRender {
                params,
                files: self.render_files.clone(),
            });
        }

        if self.render_files.is_empty() {
            ui.label(
                RichText::new("Select at least one sketch to submit.")
                    .small()
                    .color(Color32::GRAY),
            );
        }

        self.show_job_status(ui, pending, "Rendering...", view.render_phase.error_message());
    }

    fn show_mesh_form(&mut self, ui: &mut Ui, sender: &mut UiEventSender, view: &UiView<'_>) {
        ui.heading(RichText::new("✏ Source sketch").size(16.0));
        ui.add_space(5.0);
        ui.label(
            RichText::new("One sketch or reference photo of a building facade.")
                .small()
                .color(Color32::LIGHT_BLUE),
        );

        if ui.button("📁 Select sketch...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
            {
                self.mesh_file = Some(path);
            }
        }
        self.show_selection(ui, Tab::Mesh);

        ui.separator();

        // === Parameters ===
        egui::Grid::new("mesh_params").num_columns(2).show(ui, |ui| {
            ui.label("Bake texture");
            ui.checkbox(&mut self.mesh_params.bake_texture, "");
            ui.end_row();

            ui.label("Texture resolution");
            egui::ComboBox::from_id_salt("texture_resolution")
                .selected_text(self.mesh_params.texture_resolution.to_string())
                .show_ui(ui, |ui| {
                    for res in [512u32, 1024, 2048] {
                        ui.selectable_value(
                            &mut self.mesh_params.texture_resolution,
                            res,
                            res.to_string(),
                        );
                    }
                });
            ui.end_row();
        });

        ui.add_space(8.0);

        let pending = matches!(view.mesh_phase, JobPhase::Pending);
        let button = ui.add_enabled(
            !pending && self.mesh_file.is_some(),
            egui::Button::new(RichText::new("📦 Build 3D model").size(14.0))
                .min_size(egui::vec2(ui.available_width(), 30.0)),
        );
        if button.clicked() {
            if let Some(file) = self.mesh_file.clone() {
                sender.instant(UiEvent::SubmitMesh {
                    params: self.mesh_params.clone(),
                    file,
                });
            }
        }

        self.show_job_status(ui, pending, "Building...", view.mesh_phase.error_message());

        // === Downloads ===
        if !view.downloads.is_empty() {
            ui.separator();
            ui.heading(RichText::new("⬇ Assets").size(16.0));
            for (label, url) in &view.downloads {
                ui.hyperlink_to(label, url);
            }
        }

        ui.separator();

        // === Camera Controls ===
        ui.heading("🎮 Camera Controls");
        ui.label("• Left drag: Orbit");
        ui.label("• Right drag: Pan");
        ui.label("• Mouse wheel: Zoom");
        if ui.button("🔄 Reset Camera").clicked() {
            sender.instant(UiEvent::ResetCamera);
        }
    }

    fn show_selection(&mut self, ui: &mut Ui, tab: Tab) {
        let names: Vec<String> = match tab {
            Tab::Render => self.render_files.iter().map(|p| file_name(p)).collect(),
            Tab::Mesh => self.mesh_file.iter().map(|p| file_name(p)).collect(),
        };

        if names.is_empty() {
            return;
        }

        for name in &names {
            ui.label(RichText::new(name).small());
        }
        if ui.small_button("Clear selection").clicked() {
            self.render_files.clear();
            self.mesh_file = None;
        }
    }

    fn show_job_status(
        &self,
        ui: &mut Ui,
        pending: bool,
        busy_text: &str,
        error: Option<&str>,
    ) {
        if pending {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(busy_text);
            });
        }

        if let Some(msg) = error {
            egui::Frame::group(ui.style())
                .fill(Color32::from_rgb(60, 25, 25))
                .show(ui, |ui| {
                    ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::LIGHT_RED));
                    ui.label(
                        RichText::new("The request failed; adjust and resubmit.")
                            .small()
                            .color(Color32::GRAY),
                    );
                });
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
