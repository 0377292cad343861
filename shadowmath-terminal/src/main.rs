/// Shadowmath terminal viewer
///
/// Renders the soft-shadow demo scene as ASCII art.
/// Controls:
///   - A/D / Arrow Keys: Change spin speed
///   - P: Toggle perspective / orthographic
///   - Q/ESC: Quit

use clap::Parser;
use shadowmath_terminal::{Cli, TerminalApp, ViewerConfig};
use std::io;

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        eprintln!("error: {message}");
        std::process::exit(2);
    }
    let config = ViewerConfig::from(&cli);
    log::info!("starting viewer with {config:?}");

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_millis(500));

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    Ok(())
}
