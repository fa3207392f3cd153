use egui::{Color32, Context, RichText};

use crate::events::UiEvent;
use crate::ui::{Tab, UiEventSender, UiView};

#[derive(Default)]
pub struct TopPanel {}

impl TopPanel {
    pub fn show(&mut self, ctx: &Context, sender: &mut UiEventSender, view: &UiView<'_>) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🏛 ArchiVision");
                ui.separator();

                for (tab, label) in [(Tab::Render, "🎨 Render"), (Tab::Mesh, "📦 3D Model")] {
                    if ui.selectable_label(view.tab == tab, label).clicked() {
                        sender.instant(UiEvent::SelectTab(tab));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = match view.backend_ok {
                        None => ("Backend: checking...", Color32::GRAY),
                        Some(true) => ("Backend: online", Color32::GREEN),
                        Some(false) => ("Backend: unreachable", Color32::RED),
                    };
                    ui.label(RichText::new(text).color(color));
                    ui.label(RichText::new(view.base_url).small().color(Color32::GRAY));
                });
            });
        });
    }
}
