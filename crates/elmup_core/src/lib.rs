mod error;
pub use error::*;
mod host;
pub use host::*;
mod plugin;
pub use plugin::*;
mod utils;
pub use utils::*;
