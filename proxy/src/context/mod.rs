mod proxy_context;
mod guest_dispatch;
mod host_dispatch;
mod teardown;

pub use proxy_context::Context;
pub(crate) use teardown::TeardownOrigin;
