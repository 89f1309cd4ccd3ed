//! GATT server integration tests: registration, event handling, and the
//! deferred-work queue, all against the mock radio.

use pumplink::config::PumpConfig;
use pumplink::events::{AddressKind, PasskeyAction, PeerAddress, RadioEvent};
use pumplink::gatt::attrs::{AccessFlags, Characteristic, Service, Uuid, HANDLE_UNASSIGNED};
use pumplink::gatt::features::ids_service;
use pumplink::gatt::server::GattServer;
use pumplink::{Error, RegistrationError};

use crate::mock_radio::{MockRadio, RadioCall};

fn peer() -> PeerAddress {
    PeerAddress([0x66, 0x55, 0x44, 0x33, 0x22, 0x11])
}

fn connected(conn_handle: u16) -> RadioEvent {
    RadioEvent::Connected {
        conn_handle,
        addr_kind: AddressKind::Public,
        addr: peer(),
    }
}

fn disconnected(conn_handle: u16) -> RadioEvent {
    RadioEvent::Disconnected {
        conn_handle,
        addr_kind: AddressKind::Random,
        addr: peer(),
    }
}

fn server_with_ids() -> GattServer {
    let mut server = GattServer::new(123_456, 250_000);
    server.add_service(ids_service(&PumpConfig::default()));
    server
}

// ── Registration ──────────────────────────────────────────────

#[test]
fn registration_resolves_value_handles_in_order() {
    let mut server = GattServer::new(123_456, 250_000);
    let mut bare = Service::new(Uuid::Uuid16(0x180F));
    bare.add_characteristic(Characteristic::new(Uuid::Uuid16(0x2A19), AccessFlags::READ));
    bare.add_characteristic(Characteristic::new(
        Uuid::Uuid16(0x2A1A),
        AccessFlags::READ | AccessFlags::NOTIFY,
    ));
    server.add_service(bare);

    let mut radio = MockRadio::new();
    radio.scripted_handles = Some(vec![vec![7, 12]]);
    server.register(&mut radio).unwrap();

    let chars = server.services()[0].characteristics();
    assert_eq!(chars[0].value_handle(), 7);
    assert_eq!(chars[1].value_handle(), 12);
    assert_eq!(
        radio.calls,
        vec![RadioCall::RegisterServices { shape: vec![2] }]
    );
}

#[test]
fn second_registration_fails() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    let err = server.register(&mut radio).unwrap_err();
    assert!(matches!(
        err,
        Error::Registration(RegistrationError::AlreadyRegistered)
    ));
    // The second attempt never reached the radio.
    assert_eq!(radio.calls.len(), 1);
}

#[test]
fn service_count_mismatch_assigns_no_handles() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    radio.scripted_handles = Some(vec![]);

    let err = server.register(&mut radio).unwrap_err();
    assert!(matches!(
        err,
        Error::Registration(RegistrationError::ServiceCountMismatch {
            submitted: 1,
            returned: 0,
        })
    ));
    assert_eq!(
        server.services()[0].characteristics()[0].value_handle(),
        HANDLE_UNASSIGNED
    );
}

#[test]
fn characteristic_count_mismatch_assigns_no_handles() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    radio.scripted_handles = Some(vec![vec![3, 5]]);

    let err = server.register(&mut radio).unwrap_err();
    assert!(matches!(
        err,
        Error::Registration(RegistrationError::CharacteristicCountMismatch {
            service_index: 0,
            submitted: 1,
            returned: 2,
        })
    ));
    assert_eq!(
        server.services()[0].characteristics()[0].value_handle(),
        HANDLE_UNASSIGNED
    );
}

// ── Connection tracking ───────────────────────────────────────

#[test]
fn peer_tracks_connect_and_disconnect() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    assert_eq!(server.peer(), None);

    server.handle_event(&connected(0), &mut radio).unwrap();
    assert_eq!(server.peer(), Some((AddressKind::Public, peer())));

    server.handle_event(&disconnected(0), &mut radio).unwrap();
    // Disconnect records the departing peer's address too.
    assert_eq!(server.peer(), Some((AddressKind::Random, peer())));
}

#[test]
fn disconnect_defers_readvertising() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    server.handle_event(&connected(0), &mut radio).unwrap();
    server.handle_event(&disconnected(0), &mut radio).unwrap();

    // No radio call inside the event callback; it runs on drain.
    assert_eq!(radio.advertise_count(), 0);
    assert_eq!(server.pending_deferred(), 1);

    server.run_deferred(&mut radio);
    assert_eq!(server.pending_deferred(), 0);
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::StartAdvertising {
            interval_us: 250_000,
            with_payloads: false,
        })
    );
}

// ── Passkey flow ──────────────────────────────────────────────

#[test]
fn passkey_display_is_answered_from_the_runner() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    server.handle_event(&connected(0), &mut radio).unwrap();
    server
        .handle_event(
            &RadioEvent::PasskeyAction {
                conn_handle: 0,
                action: PasskeyAction::Display,
                passkey: 0,
            },
            &mut radio,
        )
        .unwrap();

    assert_eq!(server.pending_deferred(), 1);
    server.run_deferred(&mut radio);
    assert_eq!(
        radio.last_call(),
        Some(&RadioCall::ReplyPasskey {
            conn_handle: 0,
            passkey: 123_456,
        })
    );
}

#[test]
fn other_passkey_actions_are_ignored() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    for action in [
        PasskeyAction::None,
        PasskeyAction::Input,
        PasskeyAction::NumericComparison,
    ] {
        server
            .handle_event(
                &RadioEvent::PasskeyAction {
                    conn_handle: 0,
                    action,
                    passkey: 0,
                },
                &mut radio,
            )
            .unwrap();
    }
    assert_eq!(server.pending_deferred(), 0);
}

// ── Read dispatch ─────────────────────────────────────────────

#[test]
fn read_on_unknown_handle_is_ignored() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    server
        .handle_event(
            &RadioEvent::ReadRequested {
                conn_handle: 0,
                value_handle: 9999,
            },
            &mut radio,
        )
        .unwrap();
    assert_eq!(radio.write_count(), 0);
}

#[test]
fn read_on_unassigned_handle_zero_is_ignored() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    server
        .handle_event(
            &RadioEvent::ReadRequested {
                conn_handle: 0,
                value_handle: HANDLE_UNASSIGNED,
            },
            &mut radio,
        )
        .unwrap();
    assert_eq!(radio.write_count(), 0);
}

#[test]
fn read_without_builder_is_ignored() {
    let mut server = GattServer::new(123_456, 250_000);
    let mut bare = Service::new(Uuid::Uuid16(0x180F));
    bare.add_characteristic(Characteristic::new(Uuid::Uuid16(0x2A19), AccessFlags::READ));
    server.add_service(bare);

    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();
    let handle = server.services()[0].characteristics()[0].value_handle();

    server
        .handle_event(
            &RadioEvent::ReadRequested {
                conn_handle: 0,
                value_handle: handle,
            },
            &mut radio,
        )
        .unwrap();
    assert_eq!(radio.write_count(), 0);
}

// ── Auxiliary subscribers ─────────────────────────────────────

#[test]
fn subscribers_see_every_event() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen2 = Rc::clone(&seen);
    server.subscribe(Box::new(move |event| {
        seen2.borrow_mut().push(*event);
        None
    }));

    server.handle_event(&connected(0), &mut radio).unwrap();
    server.handle_event(&disconnected(0), &mut radio).unwrap();
    assert_eq!(*seen.borrow(), vec![connected(0), disconnected(0)]);
}

// ── Deferred queue saturation ─────────────────────────────────

#[test]
fn deferred_queue_drops_past_capacity() {
    let mut server = server_with_ids();
    let mut radio = MockRadio::new();
    server.register(&mut radio).unwrap();

    // Each disconnect schedules one re-advertise; the queue holds 8.
    for _ in 0..12 {
        server.handle_event(&disconnected(0), &mut radio).unwrap();
    }
    assert_eq!(server.pending_deferred(), 8);

    server.run_deferred(&mut radio);
    assert_eq!(server.pending_deferred(), 0);
    assert_eq!(radio.advertise_count(), 8);
}
