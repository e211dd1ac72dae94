// ── File catalog watching ──
//
// Directory enumeration plus the coordinator that reloads every printer's
// catalog whenever a watched directory sees a write.

mod catalog;
mod coordinator;

pub use catalog::{ReloadSummary, list_directory};
pub use coordinator::{CatalogWatcher, WatchEvent, WatchPhase, is_write_event};
