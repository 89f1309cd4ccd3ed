//! End-to-end protected read flow: a full connect / read / disconnect
//! session through the server, asserting the exact wire bytes a central
//! would receive.

use pumplink::config::{PumpConfig, FEATURE_E2E_PROTECTION};
use pumplink::e2e::{Crc16, RxCounter};
use pumplink::events::{AddressKind, PeerAddress, RadioEvent};
use pumplink::gatt::features::{ids_service, FEATURES_PAYLOAD_LEN};
use pumplink::gatt::server::GattServer;

use crate::mock_radio::MockRadio;

fn peer_event(connect: bool, conn_handle: u16) -> RadioEvent {
    let addr = PeerAddress([0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
    if connect {
        RadioEvent::Connected {
            conn_handle,
            addr_kind: AddressKind::Public,
            addr,
        }
    } else {
        RadioEvent::Disconnected {
            conn_handle,
            addr_kind: AddressKind::Public,
            addr,
        }
    }
}

fn read(conn_handle: u16, value_handle: u16) -> RadioEvent {
    RadioEvent::ReadRequested {
        conn_handle,
        value_handle,
    }
}

/// Validate a received payload the way a central would: recompute the CRC
/// over everything outside the CRC window and check the rolling counter.
fn central_accepts(payload: &[u8], rx: &mut RxCounter) -> bool {
    let received_crc = u16::from_le_bytes([payload[0], payload[1]]);
    let mut crc = Crc16::new();
    crc.add_bytes(&payload[2..]);
    if crc.value() != received_crc {
        return false;
    }
    if !rx.check(payload[2]) {
        return false;
    }
    rx.increment();
    true
}

#[test]
fn protected_read_session() {
    let mut server = GattServer::new(123_456, 250_000);
    server.add_service(ids_service(&PumpConfig::default()));
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();
    let handle = server.services()[0].characteristics()[0].value_handle();

    server.handle_event(&peer_event(true, 0), &mut radio).unwrap();

    // First read: counter 1.
    server.handle_event(&read(0, handle), &mut radio).unwrap();
    let first = radio.last_write(handle).unwrap().to_vec();
    assert_eq!(first.len(), FEATURES_PAYLOAD_LEN);
    assert_eq!(
        first,
        vec![0xE9, 0xC2, 0x01, 0x01, 0x20, 0xE1, 0x01, 0x00]
    );

    // Second read: counter advanced to 2, CRC re-stamped.
    server.handle_event(&read(0, handle), &mut radio).unwrap();
    assert_eq!(
        radio.last_write(handle).unwrap(),
        &[0x94, 0xCE, 0x02, 0x01, 0x20, 0xE1, 0x01, 0x00]
    );

    // Disconnect resets the Tx counter; the next session starts at 1.
    server.handle_event(&peer_event(false, 0), &mut radio).unwrap();
    server.run_deferred(&mut radio);
    server.handle_event(&peer_event(true, 1), &mut radio).unwrap();
    server.handle_event(&read(1, handle), &mut radio).unwrap();
    assert_eq!(radio.last_write(handle).unwrap(), first.as_slice());
}

#[test]
fn central_side_validation_accepts_the_stream() {
    let mut server = GattServer::new(123_456, 250_000);
    server.add_service(ids_service(&PumpConfig::default()));
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();
    let handle = server.services()[0].characteristics()[0].value_handle();

    server.handle_event(&peer_event(true, 0), &mut radio).unwrap();

    let mut rx = RxCounter::new();
    for _ in 0..5 {
        server.handle_event(&read(0, handle), &mut radio).unwrap();
        let payload = radio.last_write(handle).unwrap().to_vec();
        assert!(central_accepts(&payload, &mut rx));
    }
}

#[test]
fn tampered_payload_is_rejected() {
    let mut server = GattServer::new(123_456, 250_000);
    server.add_service(ids_service(&PumpConfig::default()));
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();
    let handle = server.services()[0].characteristics()[0].value_handle();

    server.handle_event(&peer_event(true, 0), &mut radio).unwrap();
    server.handle_event(&read(0, handle), &mut radio).unwrap();
    let mut payload = radio.last_write(handle).unwrap().to_vec();

    // Flip one feature-flag bit.
    payload[5] ^= 0x01;
    let mut rx = RxCounter::new();
    assert!(!central_accepts(&payload, &mut rx));
}

#[test]
fn unprotected_payload_keeps_placeholder_framing() {
    let config = PumpConfig {
        feature_flags: PumpConfig::default().feature_flags & !FEATURE_E2E_PROTECTION,
        ..PumpConfig::default()
    };
    let mut server = GattServer::new(123_456, 250_000);
    server.add_service(ids_service(&config));
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();
    let handle = server.services()[0].characteristics()[0].value_handle();

    server.handle_event(&read(0, handle), &mut radio).unwrap();
    let payload = radio.last_write(handle).unwrap();
    assert_eq!(&payload[..3], &[0xFF, 0xFF, 0x00]);
    assert_eq!(payload[5], 0xE0); // flags with the E2E bit cleared
}
