//! Constant values and static structures.
use lazy_static;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use chessel_core::core::score::MATE;
use chessel_core::tools::tt::TT;
//use time::time_management::TimeManager;

pub const MAX_PLY: u16 = 126;
pub const THREAD_STACK_SIZE: usize = MAX_PLY as usize + 7;

/// Scores at or above this are a forced mate found within the search tree, not a TT-stored
/// mate score still carrying its distance-from-root offset.
pub const MATE_IN_MAX_PLY: i32 = MATE as i32 - MAX_PLY as i32;
pub const MATED_IN_MAX_PLY: i32 = -(MATE as i32) + MAX_PLY as i32;

pub const DEFAULT_TT_SIZE: usize = 256;

pub const PAWN_TABLE_SIZE: usize = 16384;
pub const MATERIAL_TABLE_SIZE: usize = 8192;

static INITALIZED: AtomicBool = AtomicBool::new(false);

/// Whether the worker is allowed to print `bestmove`/`info` lines to stdout. Off
/// during embedded/test use of the engine, on for normal UCI operation.
pub static USE_STDOUT: AtomicBool = AtomicBool::new(true);

lazy_static! {
    pub static ref TT_TABLE: TT = TT::new(DEFAULT_TT_SIZE);
}

/// Global access to the transposition table. The table is exclusively owned by the
/// search worker while a search is running; the UCI loop only reaches it between
/// searches (`Clear Hash` / `Hash` resize).
#[inline(always)]
pub fn tt() -> &'static mut TT {
    unsafe { &mut *(&*TT_TABLE as *const TT as *mut TT) }
}

pub fn init_globals() {
    if !INITALIZED.swap(true, Ordering::SeqCst) {
        lazy_static::initialize(&TT_TABLE);
    }
}

pub trait PVNode {
    fn is_pv() -> bool;
}

pub struct PV {}
pub struct NonPV {}

impl PVNode for PV {
    fn is_pv() -> bool {
        true
    }
}

impl PVNode for NonPV {
    fn is_pv() -> bool {
        false
    }
}

pub trait CheckState {
    fn in_check() -> bool;
}


pub struct InCheck {}
pub struct NoCheck {}

impl CheckState for InCheck {
    fn in_check() -> bool { true}
}

impl CheckState for NoCheck {
    fn in_check() -> bool { false}
}

//
//#[cfg(test)]
//mod tests {
//    use super::*;
//    #[test]
//    fn test_da() {
//        init_globals();
//
//    }
//}