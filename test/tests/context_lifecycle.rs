use sluice_proxy::{
    ChannelError, ConnectEvent, Context, DisconnectEvent, DisconnectReason, ProxyConfig,
    ProxyError,
};
use sluice_shared::{
    wire::{wl_display, wl_registry},
    Argument, InterfaceKind, DISPLAY_OBJECT_ID, SERVER_ID_MIN,
};
use sluice_test::{MockChannel, MockGuestConnection, TestProxy};

fn context_error(channel: MockChannel) -> ProxyError {
    match Context::new(ProxyConfig::default(), Box::new(channel)) {
        Ok(_) => panic!("context creation should have failed"),
        Err(error) => error,
    }
}

#[test]
fn creation_initializes_channel_and_requests_registry() {
    let mut proxy = TestProxy::new();
    assert_eq!(proxy.host.init_calls(), 1);
    assert_eq!(proxy.host.context_calls(), 1);

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(InterfaceKind::Display, wl_display::GET_REGISTRY));
    assert_eq!(
        requests[0].arg(0),
        &Argument::NewId(proxy.context.host_registry_id())
    );
}

#[test]
fn failed_init_is_fatal() {
    let (channel, host) = MockChannel::failing_init();
    let error = context_error(channel);

    assert!(matches!(
        error,
        ProxyError::Transport(ChannelError::InitFailed { .. })
    ));
    assert!(error.is_fatal());
    assert_eq!(host.context_calls(), 0);
}

#[test]
fn failed_context_creation_is_fatal() {
    let (channel, host) = MockChannel::failing_context();
    let error = context_error(channel);

    assert!(matches!(
        error,
        ProxyError::Transport(ChannelError::ContextCreationFailed { .. })
    ));
    assert!(error.is_fatal());
    assert_eq!(host.init_calls(), 1);
}

#[test]
fn connect_and_disconnect_emit_events() {
    let mut proxy = TestProxy::new();
    let guest = proxy.connect();

    let mut events = proxy.pump();
    assert!(!events.is_empty());
    assert_eq!(events.read::<ConnectEvent>().collect::<Vec<_>>(), vec![guest.key()]);
    assert!(!events.has::<DisconnectEvent>());

    assert!(proxy.context.disconnect_guest(&guest.key()));
    assert!(!proxy.context.disconnect_guest(&guest.key()));
    assert!(guest.connection().is_disconnected());

    let disconnections: Vec<_> = proxy.pump().read::<DisconnectEvent>().collect();
    assert_eq!(disconnections, vec![(guest.key(), DisconnectReason::Requested)]);
    assert!(proxy.pump().is_empty());
}

#[test]
fn guest_closing_its_connection_is_reported() {
    let mut proxy = TestProxy::new();
    let (connection, handle) = MockGuestConnection::new();
    let guest = proxy.connect_with(connection, handle);
    proxy.pump();

    guest.connection().close();
    let disconnections: Vec<_> = proxy.pump().read::<DisconnectEvent>().collect();
    assert_eq!(
        disconnections,
        vec![(guest.key(), DisconnectReason::ConnectionClosed)]
    );
    assert!(proxy.context.guest_keys().is_empty());
}

#[test]
fn host_protocol_error_is_fatal() {
    let mut proxy = TestProxy::new();
    proxy.host_send(
        DISPLAY_OBJECT_ID,
        wl_display::ERROR,
        vec![
            Argument::Object(DISPLAY_OBJECT_ID),
            Argument::Uint(wl_display::ERROR_IMPLEMENTATION),
            Argument::string("compositor crashed"),
        ],
    );

    let error = proxy.context.receive().err().unwrap();
    assert_eq!(
        error,
        ProxyError::HostError {
            object_id: DISPLAY_OBJECT_ID,
            code: wl_display::ERROR_IMPLEMENTATION,
            message: "compositor crashed".to_string(),
        }
    );
    assert!(error.is_fatal());
}

#[test]
fn host_channel_loss_is_fatal() {
    let mut proxy = TestProxy::new();
    proxy.host.close();

    let error = proxy.context.receive().err().unwrap();
    assert_eq!(error, ProxyError::Transport(ChannelError::Disconnected));
}

#[test]
fn unknown_host_events_are_skipped() {
    let mut proxy = TestProxy::new();
    let registry = proxy.context.host_registry_id();
    proxy.host_send(registry, 7, Vec::new());
    proxy.host_send(4242, wl_registry::GLOBAL, Vec::new());
    proxy.announce(1, "wl_compositor", 4);
    proxy.pump();

    let mut guest = proxy.connect();
    guest.get_registry();
    proxy.pump();
    let events = guest.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].arg(0), &Argument::Uint(SERVER_ID_MIN));
}

#[test]
fn guests_get_distinct_keys() {
    let mut proxy = TestProxy::new();
    let first = proxy.connect();
    let second = proxy.connect();

    assert_ne!(first.key(), second.key());
    assert_eq!(proxy.context.guest_keys(), vec![first.key(), second.key()]);
}

#[test]
fn guest_bytes_can_be_fed_directly() {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_compositor", 4);
    proxy.pump();
    let mut guest = proxy.connect();

    let request = sluice_test::encode(&sluice_shared::Message::new(
        DISPLAY_OBJECT_ID,
        wl_display::GET_REGISTRY,
        vec![Argument::NewId(2)],
    ));
    guest.allocate(InterfaceKind::Registry);
    proxy
        .context
        .process_guest_bytes(&guest.key(), &request[..6])
        .unwrap();
    proxy
        .context
        .process_guest_bytes(&guest.key(), &request[6..])
        .unwrap();
    proxy.context.flush().unwrap();

    let events = guest.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].is(InterfaceKind::Registry, wl_registry::GLOBAL));
}

#[test]
fn host_bytes_can_be_fed_directly() {
    let mut proxy = TestProxy::new();
    let registry = proxy.context.host_registry_id();
    let announce = sluice_test::encode(&sluice_shared::Message::new(
        registry,
        wl_registry::GLOBAL,
        vec![
            Argument::Uint(9),
            Argument::string("wl_compositor"),
            Argument::Uint(4),
        ],
    ));

    for chunk in announce.chunks(5) {
        proxy.context.process_host_bytes(chunk).unwrap();
    }

    let globals = proxy.context.registry().advertisements();
    assert_eq!(globals.len(), 1);
    assert_eq!(globals[0].interface, "wl_compositor");
}
