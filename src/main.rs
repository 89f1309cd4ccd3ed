//! PumpLink demo binary.
//!
//! Wires the GATT core to the simulated radio adapter and drives it
//! through a scripted session: register, advertise, connect, pair, read
//! the E2E-protected features characteristic, disconnect, reconnect.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                │
//! │                                                      │
//! │   SimRadio (RadioPort)        pump.json (config)     │
//! │                                                      │
//! │  ─────────────── Port Trait Boundary ──────────────  │
//! │                                                      │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │          GattServer (pure logic)               │  │
//! │  │  registration · event fan-out · E2E · SFLOAT   │  │
//! │  └────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use pumplink::adapters::sim_radio::SimRadio;
use pumplink::config;
use pumplink::events::{AddressKind, PasskeyAction, PeerAddress, RadioEvent};
use pumplink::gatt::adv::{advertising_payload, scan_response_payload};
use pumplink::gatt::features::ids_service;
use pumplink::gatt::radio::RadioPort;
use pumplink::gatt::server::GattServer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("PumpLink v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load_or_default(Path::new("pump.json"));
    config.validate().context("invalid configuration")?;

    let mut radio = SimRadio::new();
    let mut server = GattServer::new(config.passkey, config.adv_interval_us);
    server.add_service(ids_service(&config));

    server
        .register(&mut radio)
        .context("GATT registration failed")?;

    let adv = advertising_payload().context("advertising payload")?;
    let scan = scan_response_payload(&config.local_name).context("scan response payload")?;
    radio
        .start_advertising(
            config.adv_interval_us,
            Some(adv.as_bytes()),
            Some(scan.as_bytes()),
        )
        .context("advertising start failed")?;

    // First readable value handle, for the scripted reads below.
    let features_handle = server.services()[0].characteristics()[0].value_handle();

    let peer = PeerAddress([0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
    let session = [
        RadioEvent::Connected {
            conn_handle: 0,
            addr_kind: AddressKind::Public,
            addr: peer,
        },
        RadioEvent::PasskeyAction {
            conn_handle: 0,
            action: PasskeyAction::Display,
            passkey: 0,
        },
        RadioEvent::ReadRequested {
            conn_handle: 0,
            value_handle: features_handle,
        },
        RadioEvent::ReadRequested {
            conn_handle: 0,
            value_handle: features_handle,
        },
        RadioEvent::Disconnected {
            conn_handle: 0,
            addr_kind: AddressKind::Public,
            addr: peer,
        },
        // Reconnect: the E2E counter starts over at 1.
        RadioEvent::Connected {
            conn_handle: 1,
            addr_kind: AddressKind::Public,
            addr: peer,
        },
        RadioEvent::ReadRequested {
            conn_handle: 1,
            value_handle: features_handle,
        },
        RadioEvent::Disconnected {
            conn_handle: 1,
            addr_kind: AddressKind::Public,
            addr: peer,
        },
    ];

    for event in &session {
        server
            .handle_event(event, &mut radio)
            .context("event handling failed")?;
        // The cooperative runner slot: deferred work runs strictly
        // outside the event callback.
        server.run_deferred(&mut radio);
    }

    info!("Session complete");
    Ok(())
}
