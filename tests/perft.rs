use botvinnik::perft::{divide, perft, Perft};
use botvinnik::position::Position;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const PROMOTIONS: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const DISCOVERED: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn run(fen: &str, depth: u32) -> Perft {
    let position = Position::read_fen(fen).unwrap();
    let mut counter = Perft::new();
    counter.run(&position, depth);
    counter
}

#[test]
fn test_start_position() {
    let position = Position::new();
    assert_eq!(perft(&position, 1), 20);
    assert_eq!(perft(&position, 2), 400);

    let mut counter = Perft::new();
    assert_eq!(counter.run(&position, 3), 8902);
    assert_eq!(counter.captures, 34);
    assert_eq!(counter.en_passants, 0);
    assert_eq!(counter.castles, 0);
    assert_eq!(counter.checks, 12);
    assert_eq!(counter.checkmates, 0);
}

#[test]
fn test_kiwipete() {
    let shallow = run(KIWIPETE, 1);
    assert_eq!(shallow.nodes, 48);
    assert_eq!(shallow.captures, 8);
    assert_eq!(shallow.castles, 2);
    assert_eq!(shallow.checks, 0);

    let deep = run(KIWIPETE, 2);
    assert_eq!(deep.nodes, 2039);
    assert_eq!(deep.captures, 351);
    assert_eq!(deep.en_passants, 1);
    assert_eq!(deep.castles, 91);
    assert_eq!(deep.promotions, 0);
    assert_eq!(deep.checks, 3);
}

#[test]
fn test_rook_and_pawn_endgame() {
    assert_eq!(run(ENDGAME, 1).nodes, 14);
    assert_eq!(run(ENDGAME, 2).nodes, 191);

    let deep = run(ENDGAME, 3);
    assert_eq!(deep.nodes, 2812);
    assert_eq!(deep.captures, 209);
    assert_eq!(deep.en_passants, 2);
    assert_eq!(deep.checks, 267);
}

#[test]
fn test_promotion_heavy_position() {
    assert_eq!(run(PROMOTIONS, 1).nodes, 6);

    let deep = run(PROMOTIONS, 2);
    assert_eq!(deep.nodes, 264);
    assert_eq!(deep.captures, 87);
    assert_eq!(deep.castles, 6);
    assert_eq!(deep.promotions, 48);
    assert_eq!(deep.checks, 10);
}

#[test]
fn test_discovered_check_position() {
    assert_eq!(run(DISCOVERED, 1).nodes, 44);
    assert_eq!(run(DISCOVERED, 2).nodes, 1486);
}

#[test]
fn test_divide_matches_total() {
    let position = Position::read_fen(KIWIPETE).unwrap();
    let split = divide(&position, 2);
    assert_eq!(split.len(), 48);
    assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 2039);
}
