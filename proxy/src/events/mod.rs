mod proxy_events;

pub use proxy_events::{ConnectEvent, DisconnectEvent, DisconnectReason, ProxyEvent, ProxyEvents};
