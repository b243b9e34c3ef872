//! The single search worker and the two atomic flags used to cancel or redirect it.
//!
//! The engine runs exactly one search worker at a time. A separate thread (the UCI
//! protocol loop reading stdin) may only ever touch two atomic flags on this worker:
//! `stop`, to cancel the current search, and `ponderhit`, to convert a pondering
//! search into a normal timed one without restarting it. Everything else the worker
//! owns (transposition table generation, pawn/material caches, move-ordering
//! history tables, the root move list) is read and written exclusively by the
//! worker thread itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::thread::{self, JoinHandle};
use std::{mem, ptr};

use chessel_core::board::*;
use chessel_core::core::piece_move::BitMove;
use chessel_core::tools::sync_arc::Arc;
use chessel_core::MoveList;

use log::info;

use search::Searcher;
use sync::LockLatch;
use time::uci_timer::*;
use time::timer;

use consts::*;

// Dummy wrapper to let a raw pointer cross into the spawned worker thread.
struct SearcherPtr(*mut Searcher);

unsafe impl Send for SearcherPtr {}

const KILOBYTE: usize = 1000;
const THREAD_STACK_SIZE: usize = 18000 * KILOBYTE;
const POOL_SIZE: usize = mem::size_of::<Worker>();

type DummyWorker = [u8; POOL_SIZE];

/// The single global worker. Same cheap same-size-array trick the teacher used for its
/// thread pool singleton, kept because the rest of the engine reaches it through a
/// plain function rather than a `lazy_static`/`Once`-wrapped reference.
pub static mut WORKER: DummyWorker = [0; POOL_SIZE];

static WORKER_INIT: Once = Once::new();

/// Initializes the worker, called once on startup.
#[cold]
pub fn init_threadpool() {
    WORKER_INIT.call_once(|| unsafe {
        // Build the worker on a spawned thread so the ~18MB search stack it owns
        // doesn't have to fit on the thread that's constructing it.
        let builder = thread::Builder::new()
            .name("Starter".to_string())
            .stack_size(THREAD_STACK_SIZE);

        let handle = builder.spawn(|| {
            let worker: *mut Worker = mem::transmute(&mut WORKER);
            ptr::write(worker, Worker::new());
        });
        handle.unwrap().join().unwrap();
    });
}

/// Returns access to the global search worker.
#[inline(always)]
pub fn threadpool() -> &'static mut Worker {
    unsafe { mem::transmute::<&mut DummyWorker, &'static mut Worker>(&mut WORKER) }
}

/// The engine's single search worker plus the dedicated OS thread it runs searches on.
///
/// `stop` and `ponderhit` are the only fields the UCI-reading thread is allowed to
/// touch directly; every other field belongs to the worker thread.
pub struct Worker {
    searcher: Box<Searcher>,
    handle: Option<JoinHandle<()>>,
    /// Signals the worker thread to wake up and start `searcher.go()`.
    go: Arc<LockLatch>,
    /// Cancels the running (or about to run) search. Checked by the searcher at
    /// node-count checkpoints.
    pub stop: AtomicBool,
    /// Set by `ponderhit`: the pondering search should now respect real time limits.
    pub ponderhit: AtomicBool,
}

impl Worker {
    fn new() -> Self {
        let go = Arc::new(LockLatch::new());
        go.lock();
        let mut searcher = Box::new(Searcher::new(0, go.clone()));
        let searcher_ptr = SearcherPtr(&mut *searcher);

        let builder = thread::Builder::new()
            .name("search-worker".to_string())
            .stack_size(THREAD_STACK_SIZE);

        let handle = builder
            .spawn(move || {
                let searcher_ptr = searcher_ptr;
                let searcher: &mut Searcher = unsafe { &mut *searcher_ptr.0 };
                searcher.cond.lock();
                searcher.idle_loop();
            })
            .unwrap();

        Worker {
            searcher,
            handle: Some(handle),
            go,
            stop: AtomicBool::new(true),
            ponderhit: AtomicBool::new(false),
        }
    }

    /// Sets the use of standard out. This can be changed mid search as well.
    #[inline(always)]
    pub fn stdout(&mut self, use_stdout: bool) {
        USE_STDOUT.store(use_stdout, Ordering::Relaxed);
    }

    /// Sets the search worker to stop (or not).
    #[inline(always)]
    pub fn set_stop(&mut self, stop: bool) {
        self.stop.store(stop, Ordering::Relaxed);
    }

    /// Converts an in-flight `Ponder` search into a normal timed search.
    #[inline(always)]
    pub fn set_ponderhit(&mut self, hit: bool) {
        self.ponderhit.store(hit, Ordering::Relaxed);
    }

    /// Waits for the worker to finish the current search.
    pub fn wait_for_finish(&self) {
        self.searcher.searching.wait(false);
    }

    /// Waits for the worker to start searching.
    pub fn wait_for_start(&self) {
        self.searcher.searching.wait(true);
    }

    pub fn clear_all(&mut self) {
        self.searcher.clear();
    }

    /// Starts a UCI search. The result is printed to stdout if stdout reporting is on.
    pub fn uci_search(&mut self, board: &Board, limits: &Limits) {
        if let Some(uci_timer) = limits.use_time_management() {
            timer().init(limits.start, &uci_timer, board.turn(), board.moves_played());
        } else {
            timer().start_timer(limits.start);
        }

        let root_moves: MoveList = board.generate_moves();
        assert!(!root_moves.is_empty());

        self.wait_for_finish();
        self.stop.store(false, Ordering::Relaxed);
        self.ponderhit.store(false, Ordering::Relaxed);

        info!("starting search at depth-limit {:?}", limits.use_movetime());

        self.searcher.nodes.store(0, Ordering::Relaxed);
        self.searcher.depth_completed = 0;
        self.searcher.board = board.shallow_clone();
        self.searcher.limit = limits.clone();
        self.searcher.root_moves().replace(&root_moves);

        self.go.set();
        self.wait_for_start();
        self.go.lock();
    }

    /// Performs a standard search, and blocks waiting for a returned `BitMove`.
    pub fn search(&mut self, board: &Board, limits: &Limits) -> BitMove {
        self.uci_search(board, limits);
        self.wait_for_finish();
        self.best_move()
    }

    /// Returns the best move of the last completed (or cancelled) search.
    pub fn best_move(&mut self) -> BitMove {
        self.searcher.root_moves().first().bit_move
    }

    /// Returns total number of nodes searched so far.
    pub fn nodes(&self) -> u64 {
        self.searcher.nodes.load(Ordering::Relaxed)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.wait_for_finish();
        self.searcher.kill.store(true, Ordering::SeqCst);
        self.searcher.cond.set();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
