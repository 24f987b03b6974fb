use eframe::egui;

use crate::session::BrowsingSession;

/// Floating, dismissible notice anchored at the bottom of the window. Not a
/// modal: the list underneath stays interactive while the message is up.
pub struct NoticeOverlay;

impl NoticeOverlay {
    pub fn show(ctx: &egui::Context, session: &mut BrowsingSession) {
        if !session.notice().is_visible() {
            return;
        }

        let message = session.notice().message().to_string();
        let mut dismissed = false;

        egui::Window::new("notice")
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .title_bar(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::Vec2::new(0.0, -24.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("⚠").size(18.0).color(egui::Color32::YELLOW));
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            session.dismiss_notice();
        }
    }
}
