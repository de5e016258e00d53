use log::trace;

use sluice_shared::{wire::wl_display, Argument, Message, DISPLAY_OBJECT_ID};

use crate::{context::Context, error::ProxyError, shadow::ShadowKey};

/// Which side ended an object's life
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TeardownOrigin {
    /// The guest sent the destructor request, already forwarded to the host
    GuestRequest,
    /// The host destroyed the object
    HostDestroyed,
    /// The owning guest went away; the host object is still alive
    GuestDisconnected,
}

impl Context {
    /// Removes a shadow entry and releases whatever the other side still holds.
    ///
    /// Losing a race against another teardown of the same key is not an error.
    pub(crate) fn teardown(
        &mut self,
        key: &ShadowKey,
        origin: TeardownOrigin,
    ) -> Result<(), ProxyError> {
        let entry = match self.shadows.destroy(key) {
            Ok(entry) => entry,
            Err(error) => {
                let error = ProxyError::from(error);
                if error.is_benign() {
                    trace!("Teardown of {:?} ({:?}): {}", key, origin, error);
                    return Ok(());
                }
                return Err(error);
            }
        };

        let interface = entry.interface();
        let (host, companions) = entry.into_handles();
        for companion in companions {
            if let Some(release) = companion.release_message() {
                self.queue_host(&release)?;
            }
        }

        match origin {
            TeardownOrigin::GuestDisconnected => {
                if let Some(release) = host.release_message() {
                    self.queue_host(&release)?;
                }
            }
            TeardownOrigin::GuestRequest | TeardownOrigin::HostDestroyed => {
                // The guest may already have its own destructor in flight.
                let destructible = interface.destructor_request().is_some();
                if origin == TeardownOrigin::HostDestroyed && destructible {
                    if let Some(guest) = self.guests.get_mut(&key.guest) {
                        guest.retire(key.guest_id, interface);
                    }
                }
                self.queue_guest(
                    &key.guest,
                    &Message::new(
                        DISPLAY_OBJECT_ID,
                        wl_display::DELETE_ID,
                        vec![Argument::Uint(key.guest_id)],
                    ),
                )?;
            }
        }
        Ok(())
    }
}
