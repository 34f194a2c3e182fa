// SPDX-License-Identifier: MPL-2.0

//! Console front end: drive the heater panel from a terminal.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example console -- [config.json]
//! ```
//!
//! Without a configuration file the broker defaults to `localhost:1883`.
//! Commands read from standard input:
//!
//! ```text
//! time <id> <HH:MM>     set a program start time
//! temp <id> <degrees>   set a program temperature
//! mode <id> off|active|once
//! imm <degrees>         set the immediate heating temperature
//! start | stop          immediate heating
//! update                ask the heater for its state
//! show                  print the panel
//! quit
//! ```

use std::env;
use std::io::BufRead;

use heater_control::event::PanelEvent;
use heater_control::protocol::{MqttTransport, MqttTransportBuilder};
use heater_control::types::{ActivationState, ProgramId};
use heater_control::{ClientConfig, HeaterController};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match env::args().nth(1) {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    println!(
        "Connecting to MQTT broker {}:{}...",
        config.broker.host,
        config.broker.port()
    );
    let (transport, incoming) =
        MqttTransportBuilder::from_config(&config.broker, config.topic_root.clone())
            .build()
            .await?;

    let controller = HeaterController::builder(transport)
        .config(&config)?
        .build()?;
    println!("Connected!");

    tokio::spawn({
        let controller = controller.clone();
        async move { controller.run(incoming).await }
    });
    tokio::spawn(print_events(controller.clone()));

    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = line_rx.recv().await {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.first() == Some(&"quit") {
            break;
        }
        if let Err(e) = execute(&controller, &words).await {
            println!("error: {e}");
        }
    }

    println!("Disconnecting...");
    controller.transport().disconnect().await?;
    println!("Done!");
    Ok(())
}

async fn execute(
    controller: &HeaterController<MqttTransport>,
    words: &[&str],
) -> heater_control::Result<()> {
    match words {
        ["time", id, text] => controller.program_time_changed(id.parse::<ProgramId>()?, text),
        ["temp", id, text] => controller.program_temp_changed(id.parse::<ProgramId>()?, text),
        ["mode", id, state] => {
            let state = state.parse::<ActivationState>()?;
            controller
                .activation_selected(id.parse::<ProgramId>()?, state)
                .await
        }
        ["imm", text] => controller.immediate_temp_changed(text),
        ["start"] => {
            if !controller.start_immediate().await? {
                println!("set the immediate temperature first (imm <degrees>)");
            }
            Ok(())
        }
        ["stop"] => controller.stop_immediate().await,
        ["update"] => controller.request_state_update().await,
        ["show"] => {
            show(controller);
            Ok(())
        }
        [] => Ok(()),
        _ => {
            println!("unknown command: {}", words.join(" "));
            Ok(())
        }
    }
}

fn show(controller: &HeaterController<MqttTransport>) {
    let panel = controller.panel();
    for (id, program) in panel.form().programs() {
        let time = program.time.map_or_else(|| "--:--".to_string(), |t| t.to_string());
        let temp = program
            .temperature
            .map_or_else(|| "--".to_string(), |t| t.to_string());
        println!("program {id}: {time} {temp}° {}", program.state);
    }
    if let Some(temp) = panel.form().immediate_temperature() {
        println!("immediate: {temp}°");
    }
    println!("gauge: {}", controller.gauge_view().text);
    if let Some(log) = panel.log() {
        for entry in log.iter() {
            println!("  {entry}");
        }
    }
}

async fn print_events(controller: HeaterController<MqttTransport>) {
    let mut events = controller.subscribe();
    while let Ok(event) = events.recv().await {
        match event {
            PanelEvent::LogAppended(entry) => println!("{entry}"),
            event if event.affects_gauge() => {
                println!("gauge: {}", controller.gauge_view().text);
            }
            PanelEvent::SettingsRestored(summary) => {
                println!("settings restored ({} programs)", summary.restored);
            }
            _ => {}
        }
    }
}
