use av_viewer::ViewerPhase;
use egui::{Color32, Context, RichText, Ui};

use crate::store::JobPhase;
use crate::ui::{Tab, UiEventSender, UiView};

#[derive(Default)]
pub struct CentralPanel {}

impl CentralPanel {
    pub fn show(&mut self, ctx: &Context, _sender: &mut UiEventSender, view: &UiView<'_>) {
        match view.tab {
            Tab::Render => self.show_gallery(ctx, view),
            Tab::Mesh => self.show_viewport(ctx, view),
        }
    }

    fn show_gallery(&self, ctx: &Context, view: &UiView<'_>) {
        egui::CentralPanel::default().show(ctx, |ui| match view.render_phase {
            JobPhase::Pending => {
                centered(ui, |ui| {
                    ui.spinner();
                    ui.label("Rendering sketches...");
                });
            }
            JobPhase::Failed(msg) => {
                centered(ui, |ui| {
                    ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::LIGHT_RED));
                });
            }
            _ => {
                if view.gallery.is_empty() {
                    centered(ui, |ui| {
                        ui.label(
                            RichText::new("Generated images will appear here.")
                                .color(Color32::GRAY),
                        );
                    });
                } else {
                    self.show_tiles(ui, view);
                }
            }
        });
    }

    fn show_tiles(&self, ui: &mut Ui, view: &UiView<'_>) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for tile in view.gallery {
                    match &tile.texture {
                        Some(texture) => {
                            let image = egui::Image::new((texture.id(), egui::vec2(220.0, 160.0)))
                                .sense(egui::Sense::click());
                            let response = ui.add(image).on_hover_text(&tile.url);
                            if response.clicked() {
                                ui.ctx().open_url(egui::OpenUrl::new_tab(&tile.url));
                            }
                        }
                        // Texture still downloading; keep the slot and its
                        // position in the batch order.
                        None => {
                            ui.group(|ui| {
                                ui.set_min_size(egui::vec2(220.0, 160.0));
                                ui.vertical_centered(|ui| {
                                    ui.spinner();
                                    ui.hyperlink_to(RichText::new("open").small(), &tile.url);
                                });
                            });
                        }
                    }
                }
            });
        });
    }

    /// The 3D view draws directly to the surface beneath the UI, so this
    /// panel stays transparent and only overlays status text.
    fn show_viewport(&self, ctx: &Context, view: &UiView<'_>) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::TRANSPARENT))
            .show(ctx, |ui| match view.viewer {
                ViewerPhase::NoAsset => {
                    if matches!(view.mesh_phase, JobPhase::Pending) {
                        centered(ui, |ui| {
                            ui.spinner();
                            ui.label("Building 3D model...");
                        });
                    } else {
                        centered(ui, |ui| {
                            ui.label(
                                RichText::new("Submit a sketch to build a 3D model.")
                                    .color(Color32::GRAY),
                            );
                        });
                    }
                }
                ViewerPhase::Loading => {
                    centered(ui, |ui| {
                        ui.spinner();
                        ui.label("Decoding model...");
                    });
                }
                ViewerPhase::Error(msg) => {
                    centered(ui, |ui| {
                        ui.label(RichText::new(format!("⚠ {msg}")).color(Color32::LIGHT_RED));
                    });
                }
                ViewerPhase::Displayed => {
                    ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                        ui.label(
                            RichText::new("drag: orbit  •  right drag: pan  •  wheel: zoom")
                                .small()
                                .color(Color32::from_gray(140)),
                        );
                    });
                }
            });
    }
}

fn centered(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        add_contents(ui);
    });
}
