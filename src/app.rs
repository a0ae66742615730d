//! Application shell: owns the session state and the viewport, and routes
//! completed background work into state changes and pans.

use std::sync::mpsc;
use std::time::Duration;

use chrono::Utc;
use eframe::egui;

use crate::config::Config;
use crate::geo::Coordinate;
use crate::services::Services;
use crate::session::messages::Event;
use crate::session::state::{MarkerStore, SearchState};
use crate::widget::map_view::Viewport;
use crate::widget::{locate, map_view, search_box};

pub const APP_ID: &str = "io.github.spotter.Spotter";

pub struct App {
    config: Config,
    services: Services,
    events: mpsc::Receiver<Event>,
    store: MarkerStore,
    search: SearchState,
    viewport: Viewport,
}

impl App {
    pub fn new(config: Config, runtime: tokio::runtime::Handle, ctx: egui::Context) -> Self {
        let (services, events) = Services::new(&config, runtime, ctx);
        Self {
            config,
            services,
            events,
            store: MarkerStore::default(),
            search: SearchState::default(),
            viewport: Viewport::Loading,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    /// Apply one completed piece of background work.
    fn apply_event(&mut self, event: Event) {
        match event {
            Event::ResolverReady => self.search.ready = true,
            Event::Suggestions {
                generation,
                suggestions,
            } => self.search.apply_suggestions(generation, suggestions),
            Event::Resolved {
                generation,
                coordinate,
            } => {
                if self.search.resolve_is_current(generation) {
                    self.pan_to(coordinate);
                } else {
                    log::debug!("dropping stale resolution (generation {generation})");
                }
            }
            Event::Located(coordinate) => self.pan_to(coordinate),
        }
    }

    fn pan_to(&mut self, coordinate: Coordinate) {
        if let Viewport::Ready(ready) = &mut self.viewport {
            ready.controller.pan_to(coordinate);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.viewport.initialize(&self.config, ctx);

        match &mut self.viewport {
            Viewport::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label("Loading map");
                    });
                });
            }
            Viewport::Error(message) => {
                // terminal: nothing but the message is rendered
                let message = format!("Error loading map: {message}");
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(egui::Color32::RED, message);
                    });
                });
            }
            Viewport::Ready(ready) => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::new())
                    .show(ctx, |ui| {
                        map_view::show(ui, ready, &mut self.store, &self.config, Utc::now());
                    });

                egui::Area::new(egui::Id::new("search-overlay"))
                    .order(egui::Order::Foreground)
                    .anchor(egui::Align2::CENTER_TOP, [0.0, 16.0])
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            search_box::show(ui, &mut self.search, &self.services);
                        });
                    });

                egui::Area::new(egui::Id::new("locate-overlay"))
                    .order(egui::Order::Foreground)
                    .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
                    .show(ctx, |ui| {
                        locate::show(ui, &self.services);
                    });
            }
        }

        // keep the open overlay's relative timestamp fresh
        if self.store.selected().is_some() {
            ctx.request_repaint_after(Duration::from_secs(1));
        }
    }
}
