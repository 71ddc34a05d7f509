use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;
use tokio::{runtime::Builder, sync::mpsc, task::LocalSet};

use strap_altimeter::{app::AltimeterApp, config::Config, display::LogDisplay, SimStrap};

fn main() {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    LocalSet::new().block_on(&runtime, async {
        start_app().await;
    });
}

async fn start_app() {
    std::env::set_var("RUST_LOG", "info");
    if let Err(err) = pretty_env_logger::try_init() {
        eprintln!("WARNING: failed to initialize logging framework: {}", err);
    }

    // Simulated sensor pack: a slow climb with a wobble every few readings.
    let mut tick: u32 = 0;
    let strap = Arc::new(SimStrap::new(move || {
        tick += 1;
        1200 + tick / 3 + if tick % 7 == 0 { 15 } else { 0 }
    }));

    let app = AltimeterApp::new(strap.clone(), Box::new(LogDisplay), &Config::default());
    let led = app.led_handle();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let run_task = tokio::spawn(app.run(shutdown_rx));

    // The simulated pack raises an uptime notify every 15 s, like the
    // hardware does when it wants the watch to pull fresh state.
    let notifier = strap.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(15)).await;
            notifier.notify_uptime().await;
        }
    });

    // Feed console lines through a channel so reading stdin does not starve
    // the runtime.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(8);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(input) => {
                    if line_tx.blocking_send(input).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::error!("Error reading from console: {}", err);
                    break;
                }
            }
        }
    });

    log::info!("Type \"on\" or \"off\" to drive the strap LED, \"quit\" to exit");
    while let Some(input) = line_rx.recv().await {
        match input.trim() {
            "on" => {
                if let Err(err) = led.set_led(true).await {
                    log::error!("Error writing LED: {}", err);
                }
            }
            "off" => {
                if let Err(err) = led.set_led(false).await {
                    log::error!("Error writing LED: {}", err);
                }
            }
            "quit" => break,
            other => println!("Unrecognized input: {other}"),
        }
    }

    let _ = shutdown_tx.send(());
    let _ = run_task.await;
}
