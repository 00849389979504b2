use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use skyview_ui::{Dashboard, WeatherServices};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

const QUIT_COMMAND: &str = ":q";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skyview_core::init()?;

    let mut app = skyview_core::App::new().context("Failed to load configuration")?;
    tracing::info!("Skyview started");

    let config = app.shared_config();
    let services = WeatherServices::from_config(&config, Handle::current())
        .context("Failed to initialize weather services")?;

    let mut dashboard = Dashboard::new(services, usize::from(config.ui.card_width));
    dashboard.start();
    redraw(&dashboard)?;

    let mut lines = spawn_stdin_reader();
    let mut ticker = tokio::time::interval(config.ui.poll_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if dashboard.poll() {
                    redraw(&dashboard)?;
                }
            }
            line = lines.recv() => match line {
                Some(line) if line.trim() == QUIT_COMMAND => break,
                Some(line) => {
                    if dashboard.submit_search(&line) {
                        redraw(&dashboard)?;
                    }
                }
                // EOF
                None => break,
            },
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    // Graceful shutdown
    drop(dashboard);
    app.shutdown();

    Ok(())
}

/// Read stdin on a plain thread so a pending read never blocks runtime shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn redraw(dashboard: &Dashboard) -> Result<()> {
    let mut out = std::io::stdout().lock();
    // Clear screen, cursor home
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "{}", dashboard.render())?;
    if dashboard.is_revealed() {
        write!(out, "\nCity (or {} to quit): ", QUIT_COMMAND)?;
    }
    out.flush()?;
    Ok(())
}
