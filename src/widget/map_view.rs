//! The interactive map surface: tiles, pins, the detail overlay, and zoom
//! controls.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use eframe::egui;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpTiles, Map, MapMemory, Plugin, Position, Projector, TileId};

use crate::config::{self, Config};
use crate::geo::Coordinate;
use crate::relative_time;
use crate::session::state::{MarkerId, MarkerStore};

/// Pixel radius within which a click counts as hitting a pin rather than
/// dropping a new one.
const PIN_HIT_RADIUS: f32 = 14.0;
const PIN_RADIUS: f32 = 7.0;

const OVERLAY_TITLE: &str = "Suspicious Activity Reported";

/// Tile source expanded from the configured URL template.
#[derive(Debug, Clone)]
struct TemplateSource {
    url: String,
    attribution: &'static str,
}

impl TileSource for TemplateSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.url
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.attribution,
            url: "https://www.openstreetmap.org/copyright",
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// Imperative pan/zoom capability over the viewport, handed out by viewport
/// initialization instead of a bare mutable cell.
pub struct MapController {
    memory: MapMemory,
}

impl MapController {
    pub fn new() -> Self {
        let mut memory = MapMemory::default();
        if let Err(err) = memory.set_zoom(config::INITIAL_ZOOM) {
            log::warn!("initial zoom rejected: {err:?}");
        }
        Self { memory }
    }

    /// Recenter on `coordinate` at the close-up zoom used for search and
    /// locate results.
    pub fn pan_to(&mut self, coordinate: Coordinate) {
        self.memory.center_at(coordinate.position());
        if let Err(err) = self.memory.set_zoom(config::PAN_ZOOM) {
            log::warn!("pan zoom rejected: {err:?}");
        }
    }

    pub fn zoom_in(&mut self) {
        let _ = self.memory.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        let _ = self.memory.zoom_out();
    }

    fn memory_mut(&mut self) -> &mut MapMemory {
        &mut self.memory
    }

    /// Where the map is currently centered, if it has been panned away from
    /// the fallback center.
    pub fn center(&self) -> Option<Coordinate> {
        self.memory.detached().map(Coordinate::from)
    }

    pub fn zoom(&self) -> f64 {
        self.memory.zoom()
    }
}

/// Load-state machine for the map surface. `Error` and `Ready` are
/// terminal.
pub enum Viewport {
    /// Waiting for the first frame so tiles can attach to the egui context.
    Loading,
    /// The tile source rejected the configuration.
    Error(String),
    Ready(ReadyViewport),
}

pub struct ReadyViewport {
    tiles: HttpTiles,
    attribution: &'static str,
    pub controller: MapController,
}

impl Viewport {
    /// Move out of `Loading` once an egui context is available.
    pub fn initialize(&mut self, config: &Config, ctx: &egui::Context) {
        if !matches!(self, Viewport::Loading) {
            return;
        }
        match config.tile_url() {
            Ok(url) => {
                let attribution = if url.contains("maptiler") {
                    "© MapTiler © OpenStreetMap contributors"
                } else {
                    "© OpenStreetMap contributors"
                };
                let tiles = HttpTiles::new(
                    TemplateSource {
                        url,
                        attribution,
                    },
                    ctx.clone(),
                );
                log::info!("map viewport ready");
                *self = Viewport::Ready(ReadyViewport {
                    tiles,
                    attribution,
                    controller: MapController::new(),
                });
            }
            Err(err) => {
                log::error!("map viewport failed to initialize: {err}");
                *self = Viewport::Error(err.to_string());
            }
        }
    }
}

/// What a click on the map surface amounted to.
enum MapAction {
    DropPin(Coordinate),
    SelectPin(MarkerId),
    CloseOverlay,
}

struct Pin {
    id: MarkerId,
    position: Position,
    selected: bool,
}

struct OverlayContent {
    position: Position,
    spotted: String,
}

/// Draws pins and the selected marker's overlay, and classifies clicks.
struct PinsPlugin {
    pins: Vec<Pin>,
    overlay: Option<OverlayContent>,
    action: Arc<Mutex<Option<MapAction>>>,
}

impl PinsPlugin {
    fn emit(&self, action: MapAction) {
        *self.action.lock().unwrap() = Some(action);
    }
}

impl Plugin for PinsPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
    ) {
        let painter = ui.painter().with_clip_rect(response.rect);

        for pin in &self.pins {
            let projected = projector.project(pin.position);
            let center = egui::pos2(projected.x, projected.y);
            let fill = if pin.selected {
                egui::Color32::from_rgb(235, 90, 60)
            } else {
                egui::Color32::from_rgb(180, 40, 40)
            };
            painter.circle_filled(center, PIN_RADIUS, fill);
            painter.circle_stroke(center, PIN_RADIUS, egui::Stroke::new(1.5, egui::Color32::WHITE));
        }

        if response.clicked()
            && let Some(click_pos) = response.interact_pointer_pos()
        {
            let hit = self
                .pins
                .iter()
                .map(|pin| {
                    let projected = projector.project(pin.position);
                    (pin.id, egui::pos2(projected.x, projected.y).distance(click_pos))
                })
                .filter(|(_, distance)| *distance <= PIN_HIT_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match hit {
                Some((id, _)) => self.emit(MapAction::SelectPin(id)),
                None => {
                    let position = projector.unproject(click_pos.to_vec2());
                    self.emit(MapAction::DropPin(Coordinate::from(position)));
                }
            }
        }

        if let Some(overlay) = &self.overlay {
            let projected = projector.project(overlay.position);
            let anchor = egui::pos2(projected.x + PIN_RADIUS + 6.0, projected.y - PIN_RADIUS);

            egui::Area::new(egui::Id::new("marker-overlay"))
                .order(egui::Order::Foreground)
                .fixed_pos(anchor)
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.strong(OVERLAY_TITLE);
                            if ui.small_button("✖").clicked() {
                                self.emit(MapAction::CloseOverlay);
                            }
                        });
                        ui.label(&overlay.spotted);
                    });
                });
        }
    }
}

/// Render the interactive map and apply whatever the user clicked to the
/// store.
pub fn show(
    ui: &mut egui::Ui,
    viewport: &mut ReadyViewport,
    store: &mut MarkerStore,
    config: &Config,
    now: DateTime<Utc>,
) {
    let action: Arc<Mutex<Option<MapAction>>> = Arc::new(Mutex::new(None));

    let selected_id = store.selected().map(|m| m.id);
    let pins = store
        .markers()
        .iter()
        .map(|marker| Pin {
            id: marker.id,
            position: marker.coordinate.position(),
            selected: selected_id == Some(marker.id),
        })
        .collect();
    let overlay = store.selected().map(|marker| OverlayContent {
        position: marker.coordinate.position(),
        spotted: format!(
            "Spotted: {}",
            relative_time::format_relative(marker.dropped_at, now)
        ),
    });

    let map_rect = ui.available_rect_before_wrap();
    let plugin = PinsPlugin {
        pins,
        overlay,
        action: action.clone(),
    };

    let map = Map::new(
        Some(&mut viewport.tiles),
        viewport.controller.memory_mut(),
        config.center.position(),
    )
    .with_plugin(plugin);
    ui.add(map);

    match action.lock().unwrap().take() {
        Some(MapAction::DropPin(coordinate)) => {
            store.add(coordinate);
        }
        Some(MapAction::SelectPin(id)) => store.select(Some(id)),
        Some(MapAction::CloseOverlay) => store.select(None),
        None => {}
    }

    ui.painter().text(
        map_rect.max - egui::vec2(6.0, 4.0),
        egui::Align2::RIGHT_BOTTOM,
        viewport.attribution,
        egui::FontId::proportional(10.0),
        egui::Color32::from_black_alpha(160),
    );

    if config.show_zoom_controls {
        zoom_controls(ui, &mut viewport.controller);
    }
}

fn zoom_controls(ui: &mut egui::Ui, controller: &mut MapController) {
    egui::Area::new(egui::Id::new("zoom-controls"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -28.0])
        .show(ui.ctx(), |ui| {
            ui.vertical(|ui| {
                if ui.button(egui::RichText::new("＋").size(18.0)).clicked() {
                    controller.zoom_in();
                }
                if ui.button(egui::RichText::new("－").size(18.0)).clicked() {
                    controller.zoom_out();
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_controller_starts_at_the_initial_zoom() {
        let controller = MapController::new();
        assert_eq!(controller.zoom(), config::INITIAL_ZOOM);
        assert!(controller.center().is_none());
    }

    #[test]
    fn pan_recenters_and_zooms_in() {
        let mut controller = MapController::new();
        controller.pan_to(Coordinate::new(41.50, -74.01));

        let center = controller.center().expect("map should be detached after a pan");
        assert!((center.lat - 41.50).abs() < 1e-9);
        assert!((center.lon - -74.01).abs() < 1e-9);
        assert_eq!(controller.zoom(), config::PAN_ZOOM);
    }

    #[test]
    fn tile_template_substitutes_slippy_coordinates() {
        let source = TemplateSource {
            url: "https://tiles.example/{z}/{x}/{y}.png?key=abc".to_string(),
            attribution: "© OpenStreetMap contributors",
        };
        let url = source.tile_url(TileId {
            x: 1205,
            y: 1539,
            zoom: 12,
        });
        assert_eq!(url, "https://tiles.example/12/1205/1539.png?key=abc");
    }

    #[test]
    fn missing_key_is_a_terminal_viewport_error() {
        let config = Config::from_lookup(|_| None);
        let mut viewport = Viewport::Loading;
        viewport.initialize(&config, &egui::Context::default());
        assert!(matches!(viewport, Viewport::Error(_)));

        // terminal: a later frame does not revive it
        viewport.initialize(&config, &egui::Context::default());
        assert!(matches!(viewport, Viewport::Error(_)));
    }
}
