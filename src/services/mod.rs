//! Background services: async work spawned from the UI thread, reported
//! back as [`Event`]s on a channel and applied on the next frame.

pub mod geocode;
pub mod geolocate;

use std::sync::mpsc;

use eframe::egui;

use crate::config::{self, Config};
use crate::session::messages::Event;
use geocode::Geocoder;

/// Handle for firing service requests. Completions are posted to the event
/// channel together with a repaint request so results apply promptly.
pub struct Services {
    runtime: tokio::runtime::Handle,
    tx: mpsc::Sender<Event>,
    ctx: egui::Context,
    geocoder: Option<Geocoder>,
}

impl Services {
    pub fn new(
        config: &Config,
        runtime: tokio::runtime::Handle,
        ctx: egui::Context,
    ) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();

        let geocoder = match Geocoder::new(
            config.geocoder_url.clone(),
            config.center,
            config::SUGGESTION_BIAS_RADIUS_M,
        ) {
            Ok(geocoder) => {
                // readiness flows through the event loop like everything else
                let _ = tx.send(Event::ResolverReady);
                Some(geocoder)
            }
            Err(err) => {
                // the search box simply never enables
                log::error!("address resolver unavailable: {err}");
                None
            }
        };

        (
            Self {
                runtime,
                tx,
                ctx,
                geocoder,
            },
            rx,
        )
    }

    /// Fire a suggestion query for the current search text.
    pub fn fetch_suggestions(&self, generation: u64, query: String) {
        let Some(geocoder) = self.geocoder.clone() else {
            return;
        };
        if query.trim().is_empty() {
            self.post(Event::Suggestions {
                generation,
                suggestions: Vec::new(),
            });
            return;
        }

        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let suggestions = match geocoder.suggest(&query).await {
                Ok(suggestions) => suggestions,
                Err(err) => {
                    log::warn!("address suggestion failed: {err}");
                    // an empty list keeps the popup in sync with reality
                    Vec::new()
                }
            };
            post(&tx, &ctx, Event::Suggestions {
                generation,
                suggestions,
            });
        });
    }

    /// Resolve a chosen suggestion to a coordinate. Failure is logged and
    /// swallowed; the map stays where it was.
    pub fn resolve_address(&self, generation: u64, description: String) {
        let Some(geocoder) = self.geocoder.clone() else {
            return;
        };
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            match geocoder.resolve(&description).await {
                Ok(coordinate) => post(&tx, &ctx, Event::Resolved {
                    generation,
                    coordinate,
                }),
                Err(err) => log::warn!("address resolution failed for {description:?}: {err}"),
            }
        });
    }

    /// Request the current position once. Failure is silent by design.
    pub fn locate(&self) {
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            match geolocate::current_position().await {
                Ok(coordinate) => post(&tx, &ctx, Event::Located(coordinate)),
                Err(err) => log::debug!("geolocation unavailable: {err:#}"),
            }
        });
    }

    fn post(&self, event: Event) {
        post(&self.tx, &self.ctx, event);
    }
}

fn post(tx: &mpsc::Sender<Event>, ctx: &egui::Context, event: Event) {
    // the receiver only disappears on shutdown
    if tx.send(event).is_ok() {
        ctx.request_repaint();
    }
}
