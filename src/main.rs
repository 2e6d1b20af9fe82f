use anyhow::Result;

use deskview::{ViewerApp, ViewerConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = ViewerConfig::load_or_default("deskview.toml");
    log::info!(
        "starting {}x{} viewer, store at '{}'",
        config.window_width,
        config.window_height,
        config.database_path
    );

    let app = ViewerApp::new(config);
    app.run();

    Ok(())
}
