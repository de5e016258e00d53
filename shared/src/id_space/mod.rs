mod error;
mod id_generator;
mod id_range;

pub use error::IdSpaceError;
pub use id_generator::IdGenerator;
pub use id_range::{
    is_guest_range, is_server_range, IdRange, CLIENT_ID_MAX, CLIENT_ID_MIN, SERVER_ID_MAX,
    SERVER_ID_MIN,
};
