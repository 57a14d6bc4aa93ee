//! Single point of ambient time dependence: a module-level clock
//! provider that tests can substitute for a fixed instant.

use chrono::{DateTime, Utc};
use std::sync::RwLock;

type ClockFn = fn() -> DateTime<Utc>;

fn system_now() -> DateTime<Utc> {
    Utc::now()
}

static CLOCK: RwLock<ClockFn> = RwLock::new(system_now);

/// Returns the current time as seen by the library.
pub fn now() -> DateTime<Utc> {
    (CLOCK.read().expect("clock lock poisoned"))()
}

/// Overrides the clock provider, for deterministic tests.
pub fn set_clock(f: ClockFn) {
    *CLOCK.write().expect("clock lock poisoned") = f;
}

/// Restores the system clock.
pub fn reset_clock() {
    set_clock(system_now);
}
