mod compiler;
pub use compiler::*;
pub mod dependencies;
mod error;
pub use error::*;
mod filter;
pub use filter::*;
mod options;
pub use options::*;
mod plugin;
pub use plugin::*;
pub mod report;
mod wrap;
pub use wrap::*;
