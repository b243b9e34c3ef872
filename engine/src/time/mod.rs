//! Time-control bookkeeping for the search worker.

pub mod time_management;
pub mod uci_timer;

use self::time_management::TimeManager;

lazy_static! {
    static ref TIMER: TimeManager = TimeManager::uninitialized();
}

/// Global access to the search worker's time manager.
#[inline(always)]
pub fn timer() -> &'static TimeManager {
    &TIMER
}
