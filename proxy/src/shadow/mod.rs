mod error;
mod host_handle;
mod shadow_entry;
mod shadow_table;

pub use error::ShadowError;
pub use host_handle::HostHandle;
pub use shadow_entry::{ExtensionState, ShadowEntry, ShadowKey};
pub use shadow_table::ShadowTable;
