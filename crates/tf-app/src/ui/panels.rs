use egui::Context;

use crate::events::AppEvent;
use crate::ui::UiEventSender;
use crate::ui::panels::form_panel::FormPanel;
use crate::ui::panels::result_panel::ResultPanel;
use crate::ui::panels::top_panel::TopPanel;

mod form_panel;
mod result_panel;
mod top_panel;

#[derive(Default)]
pub struct Panels {
    pub top: TopPanel,
    pub form: FormPanel,
    pub result: ResultPanel,
}

impl Panels {
    /// Draw all panels. Each panel can push UiEvents into the sender.
    pub fn draw(&mut self, ctx: &Context, sender: &mut UiEventSender) {
        self.top.show(ctx, sender);
        self.form.show(ctx, sender);
        self.result.show(ctx, sender);
    }

    /// Broadcast AppEvent to each panel.
    pub fn on_app_event(&mut self, ev: &AppEvent) {
        self.top.on_app_event(ev);
        self.form.on_app_event(ev);
        self.result.on_app_event(ev);
    }
}
