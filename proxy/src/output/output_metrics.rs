use sluice_shared::wire::{wl_output, zaura_output};

use crate::output::{OutputEvent, OutputGeometry, OutputMode, OutputSnapshot};

/// Where an output is between two commit boundaries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputPhase {
    /// Nothing has been received or committed yet
    Empty,
    /// Fragments have arrived since the last commit and are not yet visible
    Accumulating,
    /// The last thing received was a commit; the visible state is current
    Committing,
}

/// Merges the core and extension event streams of one output into ordered
/// guest-facing bursts.
///
/// Fragments only ever touch `pending`. `on_core_done` copies `pending` into
/// `committed` and produces the burst, so the guest never sees a half-applied
/// update regardless of which stream a fragment came from.
pub struct OutputMetrics {
    pending: OutputSnapshot,
    committed: Option<OutputSnapshot>,
    phase: OutputPhase,
    use_extension_scale: bool,
}

impl OutputMetrics {
    pub fn new(use_extension_scale: bool) -> Self {
        Self {
            pending: OutputSnapshot::default(),
            committed: None,
            phase: OutputPhase::Empty,
            use_extension_scale,
        }
    }

    pub fn on_extension_scale(&mut self, flags: u32, value: u32) {
        if flags & zaura_output::SCALE_PROPERTY_CURRENT != 0 {
            self.pending.extension_scale = Some(value);
        }
        if flags & zaura_output::SCALE_PROPERTY_PREFERRED != 0 {
            self.pending.preferred_extension_scale = Some(value);
        }
        self.touch();
    }

    pub fn on_core_geometry(&mut self, geometry: OutputGeometry) {
        self.pending.geometry = Some(geometry);
        self.touch();
    }

    /// Keeps the current mode; other modes only fill an empty slot
    pub fn on_core_mode(&mut self, mode: OutputMode) {
        if mode.flags & wl_output::MODE_CURRENT != 0 || self.pending.mode.is_none() {
            self.pending.mode = Some(mode);
        }
        self.touch();
    }

    pub fn on_core_scale_factor(&mut self, factor: i32) {
        self.pending.scale_factor = factor;
        self.touch();
    }

    pub fn on_core_name(&mut self, name: String) {
        self.pending.name = Some(name);
        self.touch();
    }

    pub fn on_core_description(&mut self, description: String) {
        self.pending.description = Some(description);
        self.touch();
    }

    /// Commits the accumulated state and returns the burst to forward.
    ///
    /// A commit with no new fragments replays the previous burst unchanged.
    pub fn on_core_done(&mut self) -> Vec<OutputEvent> {
        self.phase = OutputPhase::Committing;
        let committed = self.pending.clone();
        let events = Self::burst(&committed, self.use_extension_scale);
        self.committed = Some(committed);
        events
    }

    pub fn phase(&self) -> OutputPhase {
        self.phase
    }

    pub fn pending(&self) -> &OutputSnapshot {
        &self.pending
    }

    pub fn committed(&self) -> Option<&OutputSnapshot> {
        self.committed.as_ref()
    }

    /// The state a guest has been shown, if any commit happened yet
    pub fn visible(&self) -> Option<&OutputSnapshot> {
        self.committed()
    }

    fn touch(&mut self) {
        self.phase = OutputPhase::Accumulating;
    }

    fn burst(snapshot: &OutputSnapshot, use_extension_scale: bool) -> Vec<OutputEvent> {
        let mut events = Vec::with_capacity(6);
        if let Some(geometry) = &snapshot.geometry {
            events.push(OutputEvent::Geometry(geometry.clone()));
        }
        if let Some(mode) = snapshot.mode {
            events.push(OutputEvent::Mode(mode));
        }
        events.push(OutputEvent::Scale(
            snapshot.guest_scale(use_extension_scale),
        ));
        if let Some(name) = &snapshot.name {
            events.push(OutputEvent::Name(name.clone()));
        }
        if let Some(description) = &snapshot.description {
            events.push(OutputEvent::Description(description.clone()));
        }
        events.push(OutputEvent::Done);
        events
    }
}
