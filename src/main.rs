mod app;
mod config;
mod geo;
mod relative_time;
mod services;
mod session;
mod widget;

use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = config::Config::from_env();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start async runtime");
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Spotter")
            .with_app_id(app::APP_ID)
            .with_inner_size([1100.0, 750.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spotter",
        options,
        Box::new(move |cc| Ok(Box::new(app::App::new(config, handle, cc.egui_ctx.clone())))),
    )
}
