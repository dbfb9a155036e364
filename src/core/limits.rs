/*!
 * Simulation Limits and Constants
 *
 * Centralized location for thresholds and defaults shared by the engines
 * and the host. Organized by domain.
 */

use super::types::{Priority, Ticks};

// =============================================================================
// SCHEDULING
// =============================================================================

/// Default Round Robin time quantum (4 units)
pub const DEFAULT_QUANTUM: Ticks = 4;

/// Highest priority value still counted as "high priority" for the
/// starvation diagnostic
pub const HIGH_PRIORITY_MAX: Priority = 2;

/// Lowest priority value counted as "low priority" (at risk of starving)
pub const LOW_PRIORITY_MIN: Priority = 4;

/// Cumulative burst of high-priority work above which low-priority
/// processes are reported at risk
pub const STARVATION_BURST_THRESHOLD: Ticks = 20;

/// Priority level assumed for processes without an explicit priority
pub const UNSET_PRIORITY_LEVEL: Priority = 0;

// =============================================================================
// HOST PACING
// =============================================================================

/// Default delay between engine ticks when a host replays a run (500ms)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Upper bound accepted for the host tick interval (10s)
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;

// =============================================================================
// TRACING
// =============================================================================

/// Operation spans slower than this are logged as warnings (100ms)
pub const SLOW_OPERATION_MS: u128 = 100;
