mod combat_log;
mod sessions;

pub use combat_log::*;
pub use sessions::*;
