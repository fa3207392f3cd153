use egui::Context;

use crate::ui::panels::central_panel::CentralPanel;
use crate::ui::panels::side_panel::SidePanel;
use crate::ui::panels::top_panel::TopPanel;
use crate::ui::{UiEventSender, UiView};

mod central_panel;
mod side_panel;
mod top_panel;

#[derive(Default)]
pub struct Panels {
    pub top: TopPanel,
    pub side: SidePanel,
    pub central: CentralPanel,
}

impl Panels {
    /// Draw all panels. Each panel can push UiEvents into the sender.
    pub fn draw(&mut self, ctx: &Context, sender: &mut UiEventSender, view: &UiView<'_>) {
        self.top.show(ctx, sender, view);
        self.side.show(ctx, sender, view);
        self.central.show(ctx, sender, view);
    }
}
