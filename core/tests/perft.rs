extern crate chessel_core;

use chessel_core::board::perft::perft;
use chessel_core::Board;

#[test]
fn startpos_deep() {
    let b = Board::start_pos();
    assert_eq!(119_060_324, perft(&b, 6));
}

#[test]
fn kiwipete_deep() {
    let b = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
        .unwrap();
    assert_eq!(4_085_603, perft(&b, 4));
}

#[test]
fn duplain_deep() {
    let b = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -").unwrap();
    assert_eq!(11_030_083, perft(&b, 6));
}
