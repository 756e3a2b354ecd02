pub mod config;
pub mod header;
pub mod revision;
pub mod stamp;
pub mod template;

pub use revision::{RevisionError, RevisionTool};
pub use stamp::{StampError, StampReport};
