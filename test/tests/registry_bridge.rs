use sluice_proxy::GlobalPolicy;
use sluice_shared::{
    is_server_range,
    wire::wl_registry,
    InterfaceKind, SERVER_ID_MIN,
};
use sluice_test::{Decoded, TestProxy};

fn globals(events: &[Decoded]) -> Vec<(u32, String, u32)> {
    events
        .iter()
        .filter(|event| event.is(InterfaceKind::Registry, wl_registry::GLOBAL))
        .map(|event| {
            (
                event.arg(0).as_uint().unwrap(),
                event.arg(1).as_str().unwrap().to_string(),
                event.arg(2).as_uint().unwrap(),
            )
        })
        .collect()
}

#[test]
fn new_guest_receives_forwarded_globals_under_server_names() {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_output", 2);
    proxy.announce(2, "wl_compositor", 6);
    proxy.announce(3, "zaura_shell", 38);
    proxy.announce(4, "wl_seat", 7);
    proxy.pump();

    let mut guest = proxy.connect();
    guest.get_registry();
    proxy.pump();

    assert_eq!(
        globals(&guest.events()),
        vec![
            (SERVER_ID_MIN, "wl_output".to_string(), 2),
            (SERVER_ID_MIN + 1, "wl_compositor".to_string(), 4),
        ]
    );
}

#[test]
fn globals_announced_later_reach_every_registry() {
    let mut proxy = TestProxy::new();
    let mut first = proxy.connect();
    let mut second = proxy.connect();
    first.get_registry();
    second.get_registry();
    second.get_registry();
    proxy.pump();

    proxy.announce(9, "wl_output", 4);
    proxy.pump();

    assert_eq!(globals(&first.events()).len(), 1);
    // One event per registry object
    assert_eq!(globals(&second.events()).len(), 2);
}

#[test]
fn removed_global_is_retracted_and_not_replayed() {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_output", 2);
    proxy.announce(2, "wl_compositor", 4);
    proxy.pump();

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    proxy.pump();
    guest.events();

    proxy.retract(1);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].is(InterfaceKind::Registry, wl_registry::GLOBAL_REMOVE));
    assert_eq!(events[0].object_id(), registry);
    assert_eq!(events[0].arg(0).as_uint(), Some(SERVER_ID_MIN));

    let mut late = proxy.connect();
    late.get_registry();
    proxy.pump();
    assert_eq!(
        globals(&late.events()),
        vec![(SERVER_ID_MIN + 1, "wl_compositor".to_string(), 4)]
    );
}

#[test]
fn hidden_globals_are_never_retracted_to_guests() {
    let mut proxy = TestProxy::new();
    proxy.announce(4, "wl_seat", 7);
    proxy.pump();

    let mut guest = proxy.connect();
    guest.get_registry();
    proxy.pump();
    guest.events();

    proxy.retract(4);
    proxy.pump();
    assert!(guest.events().is_empty());
}

#[test]
fn extension_shell_is_bound_by_the_proxy() {
    let mut proxy = TestProxy::new();
    proxy.host_requests();

    proxy.announce(3, "zaura_shell", 40);
    proxy.pump();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(InterfaceKind::Registry, wl_registry::BIND));
    assert_eq!(requests[0].arg(0).as_uint(), Some(3));
    match requests[0].arg(1) {
        sluice_shared::Argument::UntypedNewId { interface, version, .. } => {
            assert_eq!(interface, "zaura_shell");
            assert_eq!(*version, 38);
        }
        other => panic!("unexpected bind argument {:?}", other),
    }
    assert_eq!(
        proxy.context.registry().global(3).and_then(|global| global.policy),
        Some(GlobalPolicy::HostOnly)
    );
}

#[test]
fn server_names_never_collide_with_guest_ids() {
    let mut proxy = TestProxy::new();
    for name in 1..=32 {
        proxy.announce(name, "wl_output", 3);
    }
    proxy.pump();

    let mut guest = proxy.connect();
    guest.get_registry();
    proxy.pump();

    let advertised = globals(&guest.events());
    assert_eq!(advertised.len(), 32);
    assert!(advertised.iter().all(|(name, ..)| is_server_range(*name)));
}
