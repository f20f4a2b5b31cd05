/// Monitor entry point.
///
/// Wires the pieces together: logger, configuration, fetcher, the stdin
/// reader that drives the Force Reconnect control, and the refresh loop.
/// One poll-classify-render cycle per trigger; fetch failures degrade to an
/// inline error panel and never crash the process.

use std::thread;

use dungeness_monitor::config::MonitorConfig;
use dungeness_monitor::ingest::usgs::Fetcher;
use dungeness_monitor::logging::{self, Component, LogLevel};
use dungeness_monitor::render::{build_payload, render_error, render_panel};
use dungeness_monitor::refresh::{ManualTrigger, RefreshLoop, Trigger};

const CONFIG_PATH: &str = "monitor.toml";

fn main() {
    if let Err(e) = run() {
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = MonitorConfig::load(CONFIG_PATH)?;
    logging::init_logger(LogLevel::Info, config.log_file.as_deref());

    logging::info(
        Component::System,
        Some(&config.gauge_id),
        &format!(
            "starting monitor: refresh every {}s, fetch timeout {}s",
            config.refresh_interval_secs, config.fetch_timeout_secs
        ),
    );

    let fetcher = Fetcher::new(&config)?;
    let refresh = RefreshLoop::new(config.refresh_interval());

    spawn_stdin_reader(refresh.manual_trigger());

    refresh.run(|trigger| run_cycle(&fetcher, trigger));

    logging::info(Component::System, Some(&config.gauge_id), "monitor stopped");
    Ok(())
}

/// Reads stdin lines and fires a manual refresh for each one. This is the
/// Force Reconnect control: pressing Enter bypasses the timer. The thread
/// ends on its own when stdin closes or the loop goes away.
fn spawn_stdin_reader(trigger: ManualTrigger) {
    thread::spawn(move || {
        let mut line = String::new();
        loop {
            line.clear();
            match std::io::stdin().read_line(&mut line) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    if !trigger.fire() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
}

/// One full refresh cycle: fetch, classify, render. The only side effect is
/// writing the panel (or error panel) to stdout.
fn run_cycle(fetcher: &Fetcher, trigger: Trigger) {
    let gauge_id = fetcher.gauge_id();
    if trigger == Trigger::Manual {
        logging::info(Component::System, Some(gauge_id), "manual refresh requested");
    }

    let checked_at = chrono::Local::now().format("%H:%M:%S").to_string();

    // Clear the screen between cycles so the panel redraws in place.
    print!("\x1b[2J\x1b[H");
    println!("Dungeness River Monitor\n");

    match fetcher.fetch() {
        Ok(reading) => {
            let payload = build_payload(&reading, gauge_id, &checked_at);
            logging::debug(
                Component::Render,
                Some(gauge_id),
                &format!("{} -> {}", payload.flow_text, payload.band.label),
            );
            println!("{}", render_panel(&payload));
        }
        Err(e) => {
            logging::log_fetch_failure(gauge_id, &e);
            println!("{}", render_error(&e, &checked_at));
        }
    }
}
