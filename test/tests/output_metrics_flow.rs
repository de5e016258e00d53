use sluice_proxy::{OutputPhase, ShadowKey};
use sluice_shared::{
    wire::{wl_output, wl_registry, zaura_output, zaura_shell},
    Argument, InterfaceKind, ObjectId, SERVER_ID_MIN,
};
use sluice_test::{Decoded, TestGuest, TestProxy};

/// Announces a zaura_shell and a wl_output, connects a guest and binds the
/// output at `version`. Returns the guest, its output id and the host ids
/// of the output and its zaura_output.
fn bound_output(proxy: &mut TestProxy, version: u32) -> (TestGuest, ObjectId, ObjectId, ObjectId) {
    proxy.announce(10, "zaura_shell", 38);
    proxy.announce(1, "wl_output", 4);
    proxy.pump();

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, SERVER_ID_MIN, InterfaceKind::Output, version);
    proxy.pump();
    guest.events();

    let host_output = proxy.host_id(&guest, output);
    let host_aura_output = proxy.companion_id(&guest, output, InterfaceKind::AuraOutput);
    (guest, output, host_output, host_aura_output)
}

fn send_geometry(proxy: &mut TestProxy, host_output: ObjectId) {
    proxy.host_send(
        host_output,
        wl_output::GEOMETRY,
        vec![
            Argument::Int(0),
            Argument::Int(0),
            Argument::Int(1920),
            Argument::Int(1080),
            Argument::Int(wl_output::SUBPIXEL_UNKNOWN),
            Argument::string("ACME"),
            Argument::string("Generic"),
            Argument::Int(wl_output::TRANSFORM_NORMAL),
        ],
    );
}

fn send_mode(proxy: &mut TestProxy, host_output: ObjectId) {
    proxy.host_send(
        host_output,
        wl_output::MODE,
        vec![
            Argument::Uint(wl_output::MODE_CURRENT | wl_output::MODE_PREFERRED),
            Argument::Int(1920),
            Argument::Int(1080),
            Argument::Int(60_000),
        ],
    );
}

fn send_extension_scale(proxy: &mut TestProxy, host_aura_output: ObjectId, value: u32) {
    proxy.host_send(
        host_aura_output,
        zaura_output::SCALE,
        vec![
            Argument::Uint(zaura_output::SCALE_PROPERTY_CURRENT),
            Argument::Uint(value),
        ],
    );
}

fn output_opcodes(events: &[Decoded]) -> Vec<u16> {
    events
        .iter()
        .filter(|event| event.interface == InterfaceKind::Output)
        .map(|event| event.message.opcode)
        .collect()
}

#[test]
fn binding_an_output_requests_its_extension_stream() {
    let mut proxy = TestProxy::new();
    proxy.host_requests();
    let (_guest, _output, host_output, host_aura_output) = bound_output(&mut proxy, 2);

    let requests = proxy.host_requests();
    let get_aura_output = requests
        .iter()
        .find(|request| request.is(InterfaceKind::AuraShell, zaura_shell::GET_AURA_OUTPUT))
        .expect("zaura_shell.get_aura_output was not sent");
    assert_eq!(get_aura_output.arg(0), &Argument::NewId(host_aura_output));
    assert_eq!(get_aura_output.arg(1), &Argument::Object(host_output));

    // The host output is bound at the advertised version
    let bind = requests
        .iter()
        .filter(|request| request.is(InterfaceKind::Registry, wl_registry::BIND))
        .last()
        .unwrap();
    assert!(matches!(bind.arg(1), Argument::UntypedNewId { version: 4, .. }));
}

#[test]
fn done_delivers_one_ordered_burst() {
    let mut proxy = TestProxy::new();
    let (mut guest, output, host_output, host_aura_output) = bound_output(&mut proxy, 2);

    send_extension_scale(&mut proxy, host_aura_output, 1000);
    send_geometry(&mut proxy, host_output);
    send_mode(&mut proxy, host_output);
    proxy.host_send(host_output, wl_output::SCALE, vec![Argument::Int(1)]);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(
        output_opcodes(&events),
        vec![wl_output::GEOMETRY, wl_output::MODE, wl_output::SCALE, wl_output::DONE]
    );
    assert!(events.iter().all(|event| event.object_id() == output));
    assert_eq!(events[0].arg(5).as_str(), Some("ACME"));
    assert_eq!(events[1].arg(1).as_int(), Some(1920));
    assert_eq!(events[2].arg(0).as_int(), Some(1));
}

#[test]
fn fragments_are_held_until_done() {
    let mut proxy = TestProxy::new();
    let (mut guest, output, host_output, host_aura_output) = bound_output(&mut proxy, 2);

    send_geometry(&mut proxy, host_output);
    send_mode(&mut proxy, host_output);
    proxy.pump();
    assert!(guest.events().is_empty());

    let key = ShadowKey::new(guest.key(), output);
    let metrics = proxy.context.output_metrics(&key).unwrap();
    assert_eq!(metrics.phase(), OutputPhase::Accumulating);
    assert!(metrics.visible().is_none());

    // The extension stream may trail the core events within a batch
    send_extension_scale(&mut proxy, host_aura_output, 2000);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[2].arg(0).as_int(), Some(2));
    assert_eq!(
        proxy.context.output_metrics(&key).unwrap().phase(),
        OutputPhase::Committing
    );
}

#[test]
fn repeated_done_replays_the_committed_state() {
    let mut proxy = TestProxy::new();
    let (mut guest, _output, host_output, _) = bound_output(&mut proxy, 2);

    send_geometry(&mut proxy, host_output);
    send_mode(&mut proxy, host_output);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();
    let first: Vec<_> = guest.events().into_iter().map(|event| event.message).collect();

    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();
    let second: Vec<_> = guest.events().into_iter().map(|event| event.message).collect();

    assert_eq!(first.len(), 4);
    assert_eq!(first, second);
}

#[test]
fn version_one_guests_only_see_geometry_and_mode() {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_output", 3);
    proxy.pump();

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, SERVER_ID_MIN, InterfaceKind::Output, 1);
    proxy.pump();
    guest.events();
    let host_output = proxy.host_id(&guest, output);

    send_geometry(&mut proxy, host_output);
    send_mode(&mut proxy, host_output);
    proxy.host_send(host_output, wl_output::SCALE, vec![Argument::Int(2)]);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    assert_eq!(
        output_opcodes(&guest.events()),
        vec![wl_output::GEOMETRY, wl_output::MODE]
    );
}

#[test]
fn version_four_guests_get_name_and_description_before_done() {
    let mut proxy = TestProxy::new();
    let (mut guest, _output, host_output, _) = bound_output(&mut proxy, 4);

    proxy.host_send(host_output, wl_output::NAME, vec![Argument::string("DP-1")]);
    proxy.host_send(
        host_output,
        wl_output::DESCRIPTION,
        vec![Argument::string("ACME Generic 24\"")],
    );
    send_geometry(&mut proxy, host_output);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    assert_eq!(
        output_opcodes(&guest.events()),
        vec![
            wl_output::GEOMETRY,
            wl_output::SCALE,
            wl_output::NAME,
            wl_output::DESCRIPTION,
            wl_output::DONE
        ]
    );
}

#[test]
fn done_without_fragments_sends_default_scale() {
    let mut proxy = TestProxy::new();
    let (mut guest, _output, host_output, _) = bound_output(&mut proxy, 2);

    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(output_opcodes(&events), vec![wl_output::SCALE, wl_output::DONE]);
    assert_eq!(events[0].arg(0).as_int(), Some(1));
}

#[test]
fn outputs_bound_before_the_shell_are_attached_late() {
    let mut proxy = TestProxy::new();
    proxy.announce(1, "wl_output", 3);
    proxy.pump();

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, SERVER_ID_MIN, InterfaceKind::Output, 3);
    proxy.pump();
    proxy.host_requests();
    guest.events();

    let key = ShadowKey::new(guest.key(), output);
    assert!(!proxy
        .context
        .shadows()
        .get(&key)
        .unwrap()
        .has_companion(InterfaceKind::AuraOutput));

    proxy.announce(10, "zaura_shell", 38);
    proxy.pump();

    let requests = proxy.host_requests();
    assert!(requests
        .iter()
        .any(|request| request.is(InterfaceKind::AuraShell, zaura_shell::GET_AURA_OUTPUT)));

    let host_output = proxy.host_id(&guest, output);
    let host_aura_output = proxy.companion_id(&guest, output, InterfaceKind::AuraOutput);
    send_extension_scale(&mut proxy, host_aura_output, 3000);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events[0].arg(0).as_int(), Some(3));
}

#[test]
fn disabled_extension_scale_uses_the_core_factor() {
    let mut config = sluice_proxy::ProxyConfig::default();
    config.use_extension_scale = false;
    let mut proxy = TestProxy::with_config(config);

    proxy.announce(10, "zaura_shell", 38);
    proxy.announce(1, "wl_output", 3);
    proxy.pump();
    let binds_shell = proxy.host_requests().iter().any(|request| {
        request.message.args.iter().any(|arg| {
            matches!(arg, Argument::UntypedNewId { interface, .. } if interface == "zaura_shell")
        })
    });
    assert!(!binds_shell);

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, SERVER_ID_MIN, InterfaceKind::Output, 3);
    proxy.pump();
    guest.events();
    let host_output = proxy.host_id(&guest, output);

    proxy.host_send(host_output, wl_output::SCALE, vec![Argument::Int(2)]);
    proxy.host_send(host_output, wl_output::DONE, vec![]);
    proxy.pump();

    let events = guest.events();
    assert_eq!(events[0].arg(0).as_int(), Some(2));
}

#[test]
fn disconnect_releases_the_extension_output_too() {
    let mut proxy = TestProxy::new();
    let (guest, _output, host_output, host_aura_output) = bound_output(&mut proxy, 3);
    proxy.host_requests();

    assert!(proxy.context.disconnect_guest(&guest.key()));
    proxy.context.flush().unwrap();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().any(|request| {
        request.is(InterfaceKind::AuraOutput, zaura_output::RELEASE)
            && request.object_id() == host_aura_output
    }));
    assert!(requests.iter().any(|request| {
        request.is(InterfaceKind::Output, wl_output::RELEASE) && request.object_id() == host_output
    }));
}

#[test]
fn old_extension_outputs_have_nothing_to_release() {
    let mut proxy = TestProxy::new();
    proxy.announce(10, "zaura_shell", 20);
    proxy.announce(1, "wl_output", 4);
    proxy.pump();

    let mut guest = proxy.connect();
    let registry = guest.get_registry();
    let output = guest.bind(registry, SERVER_ID_MIN, InterfaceKind::Output, 3);
    proxy.pump();
    let host_output = proxy.host_id(&guest, output);
    proxy.host_requests();

    assert!(proxy.context.disconnect_guest(&guest.key()));
    proxy.context.flush().unwrap();

    let requests = proxy.host_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(InterfaceKind::Output, wl_output::RELEASE));
    assert_eq!(requests[0].object_id(), host_output);
}
