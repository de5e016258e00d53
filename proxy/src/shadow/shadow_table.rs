use std::collections::{hash_map::Entry, HashMap, HashSet};

use sluice_shared::ObjectId;

use crate::{
    guest::GuestKey,
    shadow::{HostHandle, ShadowEntry, ShadowError, ShadowKey},
};

/// Arena of live shadow entries with lookups in both directions.
///
/// Every host id (primary or companion) maps back to exactly one entry, and
/// removing an entry removes all of its host ids in the same call.
pub struct ShadowTable {
    entries: HashMap<ShadowKey, ShadowEntry>,
    host_to_shadow: HashMap<ObjectId, ShadowKey>,
    guest_objects: HashMap<GuestKey, HashSet<ObjectId>>,
}

impl ShadowTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            host_to_shadow: HashMap::new(),
            guest_objects: HashMap::new(),
        }
    }

    pub fn insert(&mut self, guest: GuestKey, entry: ShadowEntry) -> Result<ShadowKey, ShadowError> {
        let key = ShadowKey::new(guest, entry.guest_id());
        if self.entries.contains_key(&key) {
            return Err(ShadowError::DuplicateId { id: key.guest_id });
        }
        let mut host_ids = vec![entry.host().id()];
        host_ids.extend(entry.companions().iter().map(HostHandle::id));
        if let Some(host_id) = host_ids
            .iter()
            .find(|host_id| self.host_to_shadow.contains_key(*host_id))
        {
            return Err(ShadowError::HostIdInUse { host_id: *host_id });
        }

        for host_id in host_ids {
            self.host_to_shadow.insert(host_id, key);
        }
        self.guest_objects
            .entry(guest)
            .or_default()
            .insert(key.guest_id);
        self.entries.insert(key, entry);
        Ok(key)
    }

    /// Binds a host-only object to an existing entry's lifetime
    pub fn attach_companion(
        &mut self,
        key: &ShadowKey,
        companion: HostHandle,
    ) -> Result<(), ShadowError> {
        let Some(entry) = self.entries.get_mut(key) else {
            return Err(ShadowError::NotFound { id: key.guest_id });
        };
        match self.host_to_shadow.entry(companion.id()) {
            Entry::Occupied(_) => Err(ShadowError::HostIdInUse {
                host_id: companion.id(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(*key);
                entry.push_companion(companion);
                Ok(())
            }
        }
    }

    /// The host id backing a guest object
    pub fn lookup(&self, key: &ShadowKey) -> Result<ObjectId, ShadowError> {
        self.entries
            .get(key)
            .map(|entry| entry.host().id())
            .ok_or(ShadowError::NotFound { id: key.guest_id })
    }

    /// The guest object a host id belongs to
    pub fn reverse_lookup(&self, host_id: ObjectId) -> Result<ShadowKey, ShadowError> {
        self.host_to_shadow
            .get(&host_id)
            .copied()
            .ok_or(ShadowError::NotFound { id: host_id })
    }

    pub fn get(&self, key: &ShadowKey) -> Option<&ShadowEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &ShadowKey) -> Option<&mut ShadowEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &ShadowKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the entry and hands its host handles to the caller.
    ///
    /// A second call for the same key fails with `NotFound`.
    pub fn destroy(&mut self, key: &ShadowKey) -> Result<ShadowEntry, ShadowError> {
        let entry = self
            .entries
            .remove(key)
            .ok_or(ShadowError::NotFound { id: key.guest_id })?;

        self.host_to_shadow.remove(&entry.host().id());
        for companion in entry.companions() {
            self.host_to_shadow.remove(&companion.id());
        }
        if let Some(objects) = self.guest_objects.get_mut(&key.guest) {
            objects.remove(&key.guest_id);
            if objects.is_empty() {
                self.guest_objects.remove(&key.guest);
            }
        }
        Ok(entry)
    }

    /// Live guest ids of one guest, in ascending order
    pub fn guest_ids(&self, guest: &GuestKey) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .guest_objects
            .get(guest)
            .map(|objects| objects.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShadowKey, &ShadowEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShadowTable {
    fn default() -> Self {
        Self::new()
    }
}
