use rickdex::gui::RickdexApp;

fn main() -> eframe::Result {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_title("Rickdex"),
        ..Default::default()
    };

    eframe::run_native("rickdex", options, Box::new(|cc| Ok(Box::new(RickdexApp::new(cc)))))
}
