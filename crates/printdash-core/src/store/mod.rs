// ── Dashboard store ──
//
// Single-lock shared state with push-based snapshot notification, plus
// the port reconciliation merge applied under that lock.

mod reconcile;
mod state;

pub use state::DashboardState;
