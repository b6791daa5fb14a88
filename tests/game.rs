use botvinnik::chess_move::MoveFactory;
use botvinnik::error::ChessError;
use botvinnik::player::MoveStatus;
use botvinnik::position::{Builder, Color, Piece, PieceType, Position};
use botvinnik::utils::parse_square;
use botvinnik::zorbrist::Zobrist;
use botvinnik::{legal_moves, make_move, search, Game};

fn play(game: &mut Game, moves: &[&str]) {
    for text in moves {
        assert_eq!(game.submit_coordinate(text).unwrap(), MoveStatus::Done, "{text}");
    }
}

#[test]
fn test_start_position_counts() {
    let position = Position::new();
    for color in Color::ALL {
        let moves = position.player(color).legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|mv| !mv.is_capture() && !mv.is_castle()));
    }
    assert_eq!(position.all_pieces().count(), 32);
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4"]);

    let reply = search(game.position(), 2).unwrap();
    assert_eq!(reply.coordinate(), "d8h4");
    assert_eq!(game.make_move(&reply), MoveStatus::Done);
    assert!(game.in_checkmate());
    assert!(!game.in_stalemate());
    assert_eq!(game.move_log().last().map(String::as_str), Some("Qh4#"));
}

#[test]
fn test_scandinavian_capture_matches_parsed_position() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5", "e4d5"]);

    let fen = "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2";
    let parsed = Position::read_fen(fen).unwrap();
    assert_eq!(game.position().to_fen(), parsed.to_fen());
    assert_eq!(game.position().to_string(), parsed.to_string());
    assert_eq!(game.position().hash(), parsed.hash());
    assert_eq!(game.move_log(), ["e4", "d5", "exd5"]);
}

#[test]
fn test_incremental_hash_through_castling() {
    let mut game = Game::new();
    play(
        &mut game,
        &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1", "f8c5", "d2d3", "e8g8"],
    );
    let zobrist = Zobrist::global();
    for position in game.history() {
        assert_eq!(position.hash(), zobrist.hash_position(position));
    }
    assert!(game.position().is_castled(Color::White));
    assert!(game.position().is_castled(Color::Black));
}

#[test]
fn test_builder_agrees_with_notation() {
    let mut builder = Builder::new();
    builder
        .set_piece(Piece::new(PieceType::King, Color::White, parse_square("e1").unwrap(), true))
        .set_piece(Piece::new(PieceType::Rook, Color::White, parse_square("a1").unwrap(), true))
        .set_piece(Piece::new(PieceType::King, Color::Black, parse_square("e8").unwrap(), true))
        .set_piece(Piece::new(PieceType::Pawn, Color::Black, parse_square("d5").unwrap(), true));
    let built = builder.build();
    let parsed = Position::read_fen("4k3/8/8/3p4/8/8/8/R3K3 w - - 0 1").unwrap();

    assert_eq!(built.tiles(), parsed.tiles());
    assert_eq!(built.hash(), parsed.hash());
    assert_eq!(built.to_fen(), parsed.to_fen());
    assert_eq!(legal_moves(&built).len(), legal_moves(&parsed).len());
    assert_eq!(built.all_pieces().count(), parsed.all_pieces().count());
}

#[test]
fn test_rejected_submissions() {
    let mut game = Game::new();
    let from = parse_square("e2").unwrap();
    let to = parse_square("e5").unwrap();
    assert!(matches!(game.submit_move(from, to, None), Err(ChessError::NoSuchMove { .. })));
    assert!(matches!(game.submit_coordinate("e9e4"), Err(ChessError::InvalidSquare(_))));
    assert_eq!(game.history().len(), 1);
}

#[test]
fn test_pinned_piece_cannot_move() {
    let position = Position::read_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    let mv = MoveFactory::parse_coordinate(&position, "e2d3").unwrap();
    let transition = make_move(&position, &mv);
    assert_eq!(transition.status(), MoveStatus::LeavesPlayerInCheck);
    assert!(transition.position().is_none());
}

#[test]
fn test_no_legal_moves_is_mate_or_stalemate() {
    let stalemate = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(stalemate.is_over());
    assert!(stalemate.in_stalemate());
    assert!(!stalemate.in_checkmate());

    let mate = Game::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(mate.is_over());
    assert!(mate.in_checkmate());
    assert!(!mate.in_stalemate());
}

#[test]
fn test_malformed_notation_is_rejected() {
    assert!(matches!(Game::from_fen("not a position"), Err(ChessError::InvalidNotation { .. })));
    assert!(matches!(
        Position::read_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
        Err(ChessError::KingCount { white: 0, black: 0 })
    ));
}
