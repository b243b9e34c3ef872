extern crate chessel_core;
extern crate chessel_engine;

use chessel_core::Board;
use chessel_engine::engine::ChesselEngine;
use chessel_engine::time::uci_timer::PreLimits;

fn best_move_uci(fen: &str, depth: u16) -> String {
    let mut limit = PreLimits::blank();
    limit.depth = Some(depth);
    let board = Board::from_fen(fen).unwrap();
    let mut engine = ChesselEngine::init(false);

    engine.search(&board, &limit);
    let bit_move = engine.await_move();

    bit_move.stringify()
}

#[test]
fn finds_mate_in_one() {
    // Rd1-g1 mates: the rook gives check along the g-file and the king has no escape.
    let result = best_move_uci("1k1r4/2p2ppp/8/8/Qb6/2R1Pn2/PP2KPPP/3r4 b - -", 2);
    assert_eq!(result, "f3g1");
}

#[test]
fn avoids_null_move_blunder_in_zugzwang() {
    let result = best_move_uci(
        "r2qr3/pb1nb1pp/1p2Qnk1/2p2p2/2PP1B2/3B1N2/PP3PPP/R4RK1 w - -",
        4,
    );
    assert_eq!(result, "g2g4");
}

#[test]
fn startpos_search_returns_a_legal_move() {
    let mut limit = PreLimits::blank();
    limit.depth = Some(3);
    let board = Board::start_pos();
    let mut engine = ChesselEngine::init(false);

    engine.search(&board, &limit);
    let bit_move = engine.await_move();

    assert!(board.legal_move(bit_move));
}
