//! Address search box with as-you-type suggestions.

use eframe::egui;

use crate::services::Services;
use crate::session::state::SearchState;

pub fn show(ui: &mut egui::Ui, search: &mut SearchState, services: &Services) {
    let field = ui.add_enabled(
        search.ready,
        egui::TextEdit::singleline(&mut search.input)
            .hint_text("Enter an address")
            .desired_width(340.0),
    );

    if field.changed() {
        let generation = search.begin_query();
        services.fetch_suggestions(generation, search.input.clone());
    }

    if search.suggestions.is_empty() {
        return;
    }

    // suggestion list right below the field; a click both fills the field
    // and kicks off resolution
    let mut chosen = None;
    for suggestion in &search.suggestions {
        let entry = ui.selectable_label(false, &suggestion.description);
        if entry.clicked() {
            chosen = Some(suggestion.description.clone());
        }
    }

    if let Some(description) = chosen {
        let generation = search.choose(&description);
        services.resolve_address(generation, description);
    }
}
