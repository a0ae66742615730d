//! Locate-me control: recenters the map on the user's current position.

use eframe::egui;

use crate::services::Services;

pub fn show(ui: &mut egui::Ui, services: &Services) {
    let button = ui
        .add(egui::Button::new(egui::RichText::new("🧭").size(22.0)))
        .on_hover_text("Center on my location");
    if button.clicked() {
        services.locate();
    }
}
