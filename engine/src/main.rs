extern crate chessel_core;
extern crate chessel_engine;
extern crate env_logger;

use chessel_engine::engine::ChesselEngine;

fn main() {
    env_logger::init();
    let mut engine = ChesselEngine::init(true);
    engine.uci();
}
