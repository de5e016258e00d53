use sluice_proxy::{DisconnectEvent, ShadowError, ShadowKey};
use sluice_shared::{
    wire::{wl_callback, wl_compositor, wl_display, wl_region, wl_surface},
    Argument, InterfaceKind, ObjectId, SERVER_ID_MIN,
};
use sluice_test::{TestGuest, TestProxy};

const OUTPUT_NAME: u32 = SERVER_ID_MIN;
const COMPOSITOR_NAME: u32 = SERVER_ID_MIN + 1;

fn proxy_with_globals() -> TestProxy {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_output", 3);
    proxy.announce(2, "wl_compositor", 4);
    proxy.pump();
    proxy
}

/// Connects a guest and binds the compositor. Returns the guest and its
/// compositor id.
fn guest_with_compositor(proxy: &mut TestProxy) -> (TestGuest, ObjectId) {
    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let compositor = guest.bind(registry, COMPOSITOR_NAME, InterfaceKind::Compositor, 4);
    proxy.pump();
    guest.events();
    (guest, compositor)
}

fn delete_ids(guest: &mut TestGuest) -> Vec<u32> {
    guest
        .events()
        .iter()
        .filter(|event| event.is(InterfaceKind::Display, wl_display::DELETE_ID))
        .map(|event| event.arg(0).as_uint().unwrap())
        .collect()
}

#[test]
fn created_objects_are_shadowed_both_ways() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    proxy.host_requests();

    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    proxy.pump();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(InterfaceKind::Compositor, wl_compositor::CREATE_SURFACE));
    assert_eq!(requests[0].object_id(), proxy.host_id(&guest, compositor));

    let host_surface = proxy.host_id(&guest, surface);
    assert_eq!(requests[0].arg(0), &Argument::NewId(host_surface));
    assert_eq!(
        proxy.context.shadows().reverse_lookup(host_surface),
        Ok(ShadowKey::new(guest.key(), surface))
    );
}

#[test]
fn guest_destroy_releases_both_sides_once() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    proxy.pump();
    let host_surface = proxy.host_id(&guest, surface);
    proxy.host_requests();

    guest.request(surface, wl_surface::DESTROY, vec![]);
    proxy.pump();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(InterfaceKind::Surface, wl_surface::DESTROY));
    assert_eq!(requests[0].object_id(), host_surface);
    assert_eq!(delete_ids(&mut guest), vec![surface]);

    let key = ShadowKey::new(guest.key(), surface);
    assert_eq!(
        proxy.context.shadows().lookup(&key),
        Err(ShadowError::NotFound { id: surface })
    );

    // The host confirming the deletion loses the race and changes nothing
    proxy.host_send(1, wl_display::DELETE_ID, vec![Argument::Uint(host_surface)]);
    proxy.pump();
    assert!(guest.events().is_empty());
    assert!(proxy.host_requests().is_empty());
}

#[test]
fn host_delete_id_tears_down_the_guest_side() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    proxy.pump();
    let host_region = proxy.host_id(&guest, region);

    proxy.host_send(1, wl_display::DELETE_ID, vec![Argument::Uint(host_region)]);
    proxy.pump();

    assert_eq!(delete_ids(&mut guest), vec![region]);
    assert!(!proxy
        .context
        .shadows()
        .contains(&ShadowKey::new(guest.key(), region)));
}

#[test]
fn guest_destroy_after_host_delete_id_is_a_no_op() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    proxy.pump();
    let host_region = proxy.host_id(&guest, region);
    proxy.host_requests();

    // Host teardown wins; the guest's destroy is already on the wire
    proxy.host_send(1, wl_display::DELETE_ID, vec![Argument::Uint(host_region)]);
    guest.request(region, wl_region::DESTROY, vec![]);
    let events = proxy.pump();

    assert!(!events.has::<DisconnectEvent>());
    assert!(!guest.connection().is_disconnected());
    assert_eq!(delete_ids(&mut guest), vec![region]);
    assert!(proxy.host_requests().is_empty());

    // Once the destroy was seen the id is unknown again
    guest.request(region, wl_region::ADD, vec![Argument::Int(0); 4]);
    proxy.pump();
    assert!(guest.connection().is_disconnected());
}

#[test]
fn requests_racing_a_host_teardown_are_dropped() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    proxy.pump();
    let host_region = proxy.host_id(&guest, region);
    proxy.host_requests();

    proxy.host_send(1, wl_display::DELETE_ID, vec![Argument::Uint(host_region)]);
    guest.request(region, wl_region::ADD, vec![Argument::Int(0); 4]);
    guest.request(
        surface,
        wl_surface::SET_OPAQUE_REGION,
        vec![Argument::Object(region)],
    );
    proxy.pump();

    assert!(!guest.connection().is_disconnected());
    assert!(proxy.host_requests().is_empty());

    // Reusing the id for a new object clears the retired record
    guest.request(
        compositor,
        wl_compositor::CREATE_REGION,
        vec![Argument::NewId(region)],
    );
    guest.request(region, wl_region::DESTROY, vec![]);
    proxy.pump();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].is(InterfaceKind::Region, wl_region::DESTROY));
    assert!(!guest.connection().is_disconnected());
}

#[test]
fn freed_guest_ids_can_be_reused() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    guest.request(region, wl_region::DESTROY, vec![]);
    guest.request(
        compositor,
        wl_compositor::CREATE_REGION,
        vec![Argument::NewId(region)],
    );
    proxy.pump();

    assert!(!guest.connection().is_disconnected());
    assert!(proxy
        .context
        .shadows()
        .contains(&ShadowKey::new(guest.key(), region)));
}

#[test]
fn object_arguments_are_mapped_to_host_ids() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    guest.request(
        region,
        wl_region::ADD,
        vec![
            Argument::Int(0),
            Argument::Int(0),
            Argument::Int(64),
            Argument::Int(64),
        ],
    );
    guest.request(surface, wl_surface::SET_OPAQUE_REGION, vec![Argument::Object(region)]);
    guest.request(surface, wl_surface::SET_OPAQUE_REGION, vec![Argument::null_object()]);
    guest.request(surface, wl_surface::COMMIT, vec![]);
    proxy.pump();

    let host_region = proxy.host_id(&guest, region);
    let requests = proxy.host_requests();
    let opaque: Vec<&Argument> = requests
        .iter()
        .filter(|request| request.is(InterfaceKind::Surface, wl_surface::SET_OPAQUE_REGION))
        .map(|request| request.arg(0))
        .collect();
    assert_eq!(
        opaque,
        vec![&Argument::Object(host_region), &Argument::Object(0)]
    );
    assert!(requests
        .last()
        .unwrap()
        .is(InterfaceKind::Surface, wl_surface::COMMIT));
}

#[test]
fn host_events_are_mapped_to_guest_ids() {
    let mut proxy = proxy_with_globals();
    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, OUTPUT_NAME, InterfaceKind::Output, 3);
    let compositor = guest.bind(registry, COMPOSITOR_NAME, InterfaceKind::Compositor, 4);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    proxy.pump();
    guest.events();

    let host_surface = proxy.host_id(&guest, surface);
    let host_output = proxy.host_id(&guest, output);
    proxy.host_send(host_surface, wl_surface::ENTER, vec![Argument::Object(host_output)]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events.len(), 1);
    assert!(events[0].is(InterfaceKind::Surface, wl_surface::ENTER));
    assert_eq!(events[0].object_id(), surface);
    assert_eq!(events[0].arg(0), &Argument::Object(output));
}

#[test]
fn events_naming_another_guests_object_are_dropped() {
    let mut proxy = proxy_with_globals();
    let (mut first, compositor) = guest_with_compositor(&mut proxy);
    let surface = first.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);

    let mut second = proxy.connect();
    let registry = second.get_registry();
    let output = second.bind(registry, OUTPUT_NAME, InterfaceKind::Output, 3);
    proxy.pump();
    second.events();

    let host_surface = proxy.host_id(&first, surface);
    let foreign_output = proxy.host_id(&second, output);
    proxy.host_send(host_surface, wl_surface::ENTER, vec![Argument::Object(foreign_output)]);
    proxy.pump();

    assert!(first.events().is_empty());
    assert!(second.events().is_empty());
}

#[test]
fn sync_is_answered_through_a_host_callback() {
    let mut proxy = proxy_with_globals();
    let mut guest = proxy.connect();
    proxy.host_requests();

    let callback = guest.sync();
    proxy.pump();

    let requests = proxy.host_requests();
    assert!(requests[0].is(InterfaceKind::Display, wl_display::SYNC));
    let host_callback = requests[0].arg(0).new_object_id().unwrap();
    assert_eq!(proxy.host_id(&guest, callback), host_callback);

    proxy.host_send(host_callback, wl_callback::DONE, vec![Argument::Uint(42)]);
    proxy.host_send(1, wl_display::DELETE_ID, vec![Argument::Uint(host_callback)]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].is(InterfaceKind::Callback, wl_callback::DONE));
    assert_eq!(events[0].object_id(), callback);
    assert_eq!(events[0].arg(0).as_uint(), Some(42));
    assert!(events[1].is(InterfaceKind::Display, wl_display::DELETE_ID));
    assert_eq!(events[1].arg(0).as_uint(), Some(callback));
    assert!(proxy.context.shadows().is_empty());
}

#[test]
fn frame_callbacks_are_version_one() {
    let mut proxy = proxy_with_globals();
    let (mut guest, compositor) = guest_with_compositor(&mut proxy);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    let callback = guest.create(surface, wl_surface::FRAME, InterfaceKind::Callback);
    proxy.pump();

    let shadows = proxy.context.shadows();
    let surface_entry = shadows.get(&ShadowKey::new(guest.key(), surface)).unwrap();
    let callback_entry = shadows.get(&ShadowKey::new(guest.key(), callback)).unwrap();
    assert_eq!(surface_entry.version(), 4);
    assert_eq!(callback_entry.version(), 1);
    assert_eq!(callback_entry.interface(), InterfaceKind::Callback);
}

#[test]
fn disconnect_releases_every_host_object() {
    let mut proxy = proxy_with_globals();
    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, OUTPUT_NAME, InterfaceKind::Output, 3);
    let compositor = guest.bind(registry, COMPOSITOR_NAME, InterfaceKind::Compositor, 4);
    let surface = guest.create(compositor, wl_compositor::CREATE_SURFACE, InterfaceKind::Surface);
    let region = guest.create(compositor, wl_compositor::CREATE_REGION, InterfaceKind::Region);
    proxy.pump();

    let host_output = proxy.host_id(&guest, output);
    let host_surface = proxy.host_id(&guest, surface);
    let host_region = proxy.host_id(&guest, region);
    proxy.host_requests();

    assert!(proxy.context.disconnect_guest(&guest.key()));
    assert!(!proxy.context.disconnect_guest(&guest.key()));
    proxy.context.flush().unwrap();

    let mut released: Vec<ObjectId> = proxy
        .host_requests()
        .iter()
        .map(|request| request.object_id())
        .collect();
    released.sort_unstable();
    let mut expected = vec![host_output, host_surface, host_region];
    expected.sort_unstable();
    assert_eq!(released, expected);

    assert!(proxy.context.shadows().is_empty());
    assert!(guest.connection().is_disconnected());
}
