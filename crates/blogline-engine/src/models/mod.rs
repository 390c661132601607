pub mod entry;
pub mod link;

pub use entry::Entry;
pub use link::{LinkKey, LinkTable, LinkTarget, MARKER};
