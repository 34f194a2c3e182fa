// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller behaviour against an in-memory transport.
//!
//! Time is paused, so debounce windows elapse instantly once every task is
//! idle.

use std::time::Duration;

use heater_control::event::PanelEvent;
use heater_control::panel::{Locale, PanelLayout};
use heater_control::protocol::{IncomingMessage, MemoryTransport};
use heater_control::types::{ActivationState, ProgramId, StartTime, Temperature};
use heater_control::HeaterController;
use tokio::sync::mpsc;
use tokio::time::sleep;

const SETTINGS: &str = r#"{"progCount":2,"programs":[{"hour":7,"min":30,"temp":45,"state":2},{"hour":18,"min":0,"temp":50,"state":"once"},{"temp":40}]}"#;

fn id(n: u8) -> ProgramId {
    ProgramId::new(n).unwrap()
}

fn classic(transport: &MemoryTransport) -> HeaterController<MemoryTransport> {
    HeaterController::builder(transport.clone())
        .layout(PanelLayout::classic())
        .build()
        .unwrap()
}

/// Waits past one debounce window.
async fn settle() {
    sleep(Duration::from_millis(1100)).await;
}

mod debouncing {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_send_last_value_once() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        for text in ["4", "45", "4", "48", "49"] {
            controller.program_temp_changed(id(1), text).unwrap();
            sleep(Duration::from_millis(100)).await;
        }
        assert!(transport.is_empty());

        settle().await;
        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "heater/command/settemp");
        assert_eq!(sent[0].payload, vec![1, 49]);
    }

    #[tokio::test(start_paused = true)]
    async fn setstart_payload_is_id_hour_minute() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_time_changed(id(3), "9:05 PM").unwrap();
        settle().await;

        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "heater/command/setstart");
        assert_eq!(sent[0].payload, vec![3, 21, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn time_and_temp_of_one_program_are_independent() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_time_changed(id(2), "06:15").unwrap();
        controller.program_temp_changed(id(2), "52").unwrap();
        settle().await;

        assert_eq!(
            transport.published_on("heater/command/setstart")[0].payload,
            vec![2, 6, 15]
        );
        assert_eq!(
            transport.published_on("heater/command/settemp")[0].payload,
            vec![2, 52]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn programs_are_independent() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_temp_changed(id(1), "40").unwrap();
        controller.program_temp_changed(id(2), "41").unwrap();
        controller.program_temp_changed(id(3), "42").unwrap();
        settle().await;

        let mut payloads: Vec<Vec<u8>> = transport.take().into_iter().map(|p| p.payload).collect();
        payloads.sort();
        assert_eq!(payloads, vec![vec![1, 40], vec![2, 41], vec![3, 42]]);
    }

    #[tokio::test(start_paused = true)]
    async fn activation_bypasses_debounce() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_temp_changed(id(1), "45").unwrap();
        controller
            .activation_selected(id(1), ActivationState::Active)
            .await
            .unwrap();

        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "heater/command/activate");
        assert_eq!(sent[0].payload, vec![1, 2]);

        settle().await;
        assert_eq!(transport.take()[0].topic, "heater/command/settemp");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_edit_drops_pending_value() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_temp_changed(id(1), "47").unwrap();
        assert!(controller.program_temp_changed(id(1), "").is_err());
        settle().await;

        assert!(transport.is_empty());
        assert_eq!(controller.panel().form().program(id(1)).unwrap().temperature, None);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_time_drops_pending_value() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_time_changed(id(2), "06:30").unwrap();
        controller.program_temp_changed(id(2), "45").unwrap();
        assert!(controller.program_time_changed(id(2), "6:").is_err());
        settle().await;

        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "heater/command/settemp");
        assert_eq!(controller.panel().form().program(id(2)).unwrap().time, None);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_edit_after_invalid_one_is_sent() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.program_temp_changed(id(1), "47").unwrap();
        assert!(controller.program_temp_changed(id(1), "4x").is_err());
        controller.program_temp_changed(id(1), "48").unwrap();
        settle().await;

        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, vec![1, 48]);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_debounce_delay() {
        let transport = MemoryTransport::new();
        let controller = HeaterController::builder(transport.clone())
            .layout(PanelLayout::classic())
            .debounce_delay(Duration::from_millis(200))
            .build()
            .unwrap();

        controller.program_temp_changed(id(1), "50").unwrap();
        sleep(Duration::from_millis(250)).await;
        assert_eq!(transport.len(), 1);
    }
}

mod immediate {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn immediate_temperature_uses_next_program_id() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.immediate_temp_changed("55").unwrap();
        controller.immediate_temp_changed("58").unwrap();
        settle().await;

        let sent = transport.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, "heater/command/settemp");
        assert_eq!(sent[0].payload, vec![4, 58]);

        let panel = controller.panel();
        assert_eq!(
            panel.log().unwrap().latest().unwrap().message,
            Locale::English.immediate_temp_sent(Temperature::new(58).unwrap(), id(4))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_immediate_edit_drops_pending_value() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        controller.immediate_temp_changed("55").unwrap();
        assert!(controller.immediate_temp_changed("abc").is_err());
        settle().await;

        assert!(transport.is_empty());
        assert_eq!(controller.panel().form().immediate_temperature(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_id_follows_program_count() {
        let transport = MemoryTransport::new();
        let layout = PanelLayout::modern().with_program_count(5).unwrap();
        let controller = HeaterController::builder(transport.clone())
            .layout(layout)
            .build()
            .unwrap();

        controller.immediate_temp_changed("60").unwrap();
        settle().await;

        assert_eq!(transport.take()[0].payload, vec![6, 60]);
    }

    #[tokio::test(start_paused = true)]
    async fn classic_start_without_temperature() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        assert!(controller.start_immediate().await.unwrap());
        assert_eq!(transport.take()[0].payload_str(), Some("start"));

        let panel = controller.panel();
        assert_eq!(
            panel.log().unwrap().latest().unwrap().message,
            Locale::English.immediate_started(None)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop() {
        let transport = MemoryTransport::new();
        let controller = HeaterController::builder(transport.clone())
            .layout(PanelLayout::modern())
            .build()
            .unwrap();

        assert!(!controller.start_immediate().await.unwrap());

        controller.immediate_temp_changed("50").unwrap();
        assert!(controller.start_immediate().await.unwrap());
        controller.stop_immediate().await.unwrap();

        let sent = transport.take();
        let texts: Vec<&str> = sent.iter().filter_map(|p| p.payload_str()).collect();
        assert_eq!(texts, ["start", "stop"]);

        let panel = controller.panel();
        let log: Vec<&str> = panel.log().unwrap().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(log[0], Locale::English.immediate_stopped());
        assert_eq!(
            log[1],
            Locale::English.immediate_started(Some(Temperature::new(50).unwrap()))
        );
    }
}

mod status {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn settings_snapshot_restores_form() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        assert!(controller.handle_message("heater/status/settings", SETTINGS));

        let panel = controller.panel();
        let first = panel.form().program(id(1)).unwrap();
        assert_eq!(first.time, Some(StartTime::new(7, 30).unwrap()));
        assert_eq!(first.temperature, Some(Temperature::new(45).unwrap()));
        assert_eq!(first.state, ActivationState::Active);

        let second = panel.form().program(id(2)).unwrap();
        assert_eq!(second.time, Some(StartTime::new(18, 0).unwrap()));
        assert_eq!(second.temperature, Some(Temperature::new(50).unwrap()));
        assert_eq!(second.state, ActivationState::Once);

        assert_eq!(
            panel.form().immediate_temperature(),
            Some(Temperature::new(40).unwrap())
        );
        assert!(transport.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_settings_leave_form_unchanged() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        controller
            .activation_selected(id(1), ActivationState::Once)
            .await
            .unwrap();
        let before = controller.panel().form().clone();

        for payload in [
            "",
            "{not json",
            r#"{"progCount":3,"programs":[]}"#,
            r#"{"progCount":1,"programs":[{"hour":99,"min":0,"temp":45,"state":2},{"temp":40}]}"#,
        ] {
            assert!(!controller.handle_message("heater/status/settings", payload));
        }

        assert_eq!(*controller.panel().form(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn log_keeps_ten_newest() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);

        for i in 0..15 {
            controller.handle_message("heater/status/log", &format!("line {i}"));
        }

        let panel = controller.panel();
        let log: Vec<String> = panel
            .log()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect();
        let expected: Vec<String> = (5..15).rev().map(|i| format!("line {i}")).collect();
        assert_eq!(log, expected);

        assert!(controller.handle_message("heater/status/logClear", ""));
        assert!(controller.panel().log().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deactivate_resets_program() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        controller.handle_message("heater/status/settings", SETTINGS);

        assert!(controller.handle_message("heater/status/deactivate", "2"));
        assert_eq!(
            controller.panel().form().program(id(2)).unwrap().state,
            ActivationState::Off
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gauge_follows_status() {
        let transport = MemoryTransport::new();
        let controller = HeaterController::builder(transport)
            .layout(PanelLayout::modern())
            .build()
            .unwrap();

        controller.handle_message("heater/status/temp", "40");
        controller.handle_message("heater/status/targetTemp", "55");
        let view = controller.gauge_view();
        assert_eq!(view.marker_percent, None);
        assert_eq!(view.text, "40°C");

        controller.handle_message("heater/status/heating", "1");
        let view = controller.gauge_view();
        assert_eq!(view.marker_percent, Some(75.0));
        assert_eq!(view.text, "40°C (target: 55°C)");
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_topics_are_ignored() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        let before = controller.panel().form().clone();

        assert!(!controller.handle_message("heater/command/settemp", "x"));
        assert!(!controller.handle_message("heater/status/temp/extra", "40"));
        assert!(!controller.handle_message("heater/status/unknown", "40"));
        assert_eq!(*controller.panel().form(), before);
        assert_eq!(controller.panel().gauge().current, None);
    }

    #[tokio::test(start_paused = true)]
    async fn run_drains_channel() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        let (tx, rx) = mpsc::channel(8);

        tx.send(IncomingMessage::new("heater/status/temp", "33"))
            .await
            .unwrap();
        tx.send(IncomingMessage::new("heater/status/current", "1"))
            .await
            .unwrap();
        drop(tx);

        controller.run(rx).await;

        let panel = controller.panel();
        assert_eq!(panel.gauge().current, Some(33));
        assert!(panel.current());
    }
}

mod events {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn debounced_send_is_broadcast() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        let mut events = controller.subscribe();

        controller.program_time_changed(id(1), "07:00").unwrap();
        settle().await;

        match events.recv().await.unwrap() {
            PanelEvent::CommandSent(publication) => {
                assert_eq!(publication.topic, "heater/command/setstart");
                assert_eq!(publication.payload, vec![1, 7, 0]);
            }
            other => panic!("expected CommandSent, got {other:?}"),
        }
        match events.recv().await.unwrap() {
            PanelEvent::LogAppended(entry) => {
                assert_eq!(
                    entry.message,
                    "Program 1 switched to off with start time 07:00 \
                     and target temperature -- degrees."
                );
            }
            other => panic!("expected LogAppended, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_is_not_logged() {
        let transport = MemoryTransport::new();
        let controller = classic(&transport);
        let mut events = controller.subscribe();
        transport.set_offline(true);

        controller.program_temp_changed(id(1), "44").unwrap();
        settle().await;

        assert!(events.try_recv().is_err());
        assert!(transport.is_empty());
    }
}
