/// Showcase Terminal - scroll-driven product showcase
///
/// Scroll down the page and the model turns, slides across the screen and
/// switches to a wireframe view halfway down.
/// Controls:
///   - j/k, Arrow Keys, Mouse Wheel: Scroll
///   - PageUp/PageDown/Space, Home/End: Jump
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use showcase_core::{AssetLoader, FloatMotion, Showcase};
use showcase_terminal::{Cli, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Showcase - loading {}...", cli.model.display());

    // The placeholder spins until the model resolves
    let asset = AssetLoader::spawn(&cli.model);
    let float = (!cli.no_float).then(FloatMotion::default);
    let stage = Showcase::new(cli.controller_config()).with_float(float);

    let mut app = TerminalApp::new(stage, asset, cli.scroll_state(), cli.frame_time())
        .context("failed to query terminal size")?;
    app.run().context("terminal session failed")?;

    println!("Thanks for scrolling!");
    Ok(())
}
