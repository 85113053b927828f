pub mod error;
pub mod game_data;
pub mod record;
pub mod types;

pub use error::{DtgeError, ErrorKind};
pub use game_data::*;
pub use record::*;
pub use types::*;
