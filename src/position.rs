//! Immutable board positions and the builder that produces them.
//!
//! A [`Position`] is never mutated after [`Builder::build`] returns it. Making
//! a move stages a fresh builder from the old position (see
//! [`crate::chess_move`]) and builds a new one, so positions can be shared
//! freely between the game history, the search and the worker thread.

use std::fmt;

use bitflags::bitflags;

use crate::chess_move::Move;
use crate::error::{ChessError, ChessResult};
use crate::movegeneration::pseudo_legal_moves;
use crate::player::{Player, PlayerState};
use crate::utils::*;
use crate::zorbrist::Zobrist;

/// Notation for the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}
use Color::*;

impl Color {
    pub const ALL: [Color; 2] = [White, Black];

    pub fn index(self) -> usize {
        match self {
            White => 0,
            Black => 1,
        }
    }

    pub fn opponent(self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }

    pub fn is_white(self) -> bool {
        self == White
    }

    /// Padded-board offset of a single pawn push. White moves toward tile 0.
    pub fn pawn_direction(self) -> i32 {
        match self {
            White => -10,
            Black => 10,
        }
    }

    /// Row on which this side's pawns start and may double step.
    pub fn pawn_home_row(self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }

    /// Row on which this side's pawns promote.
    pub fn promotion_row(self) -> usize {
        match self {
            White => 0,
            Black => 7,
        }
    }

    pub fn king_home(self) -> Square {
        match self {
            White => 60,
            Black => 4,
        }
    }

    pub fn kingside_rook_home(self) -> Square {
        match self {
            White => 63,
            Black => 7,
        }
    }

    pub fn queenside_rook_home(self) -> Square {
        match self {
            White => 56,
            Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            White => write!(f, "White"),
            Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Promotion choices in generation order.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns.
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 320,
            PieceType::Bishop => 330,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20000,
        }
    }

    /// Upper-case letter used in notation.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Reads a placement letter: upper case is white, lower case is black.
    pub fn from_letter(letter: char) -> ChessResult<(PieceType, Color)> {
        let color = if letter.is_ascii_uppercase() { White } else { Black };
        let piece_type = match letter.to_ascii_uppercase() {
            'P' => PieceType::Pawn,
            'N' => PieceType::Knight,
            'B' => PieceType::Bishop,
            'R' => PieceType::Rook,
            'Q' => PieceType::Queen,
            'K' => PieceType::King,
            _ => return Err(ChessError::InvalidPiece(letter)),
        };
        Ok((piece_type, color))
    }
}

/// A piece standing on a particular tile.
///
/// `moved` records whether the piece has left its starting tile; it drives
/// pawn double steps and castling eligibility.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Square,
    pub moved: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Square, moved: bool) -> Piece {
        Piece { piece_type, color, position, moved }
    }

    /// The same piece after it has travelled to `destination`.
    pub fn moved_to(self, destination: Square) -> Piece {
        Piece { position: destination, moved: true, ..self }
    }

    pub fn value(&self) -> i32 {
        self.piece_type.value()
    }

    /// Notation letter, upper case for white.
    pub fn letter(&self) -> char {
        match self.color {
            White => self.piece_type.letter(),
            Black => self.piece_type.letter().to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Occupied(Piece),
}

impl Tile {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Tile::Empty => None,
            Tile::Occupied(piece) => Some(*piece),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Tile::Occupied(_))
    }
}

bitflags! {
    pub struct CastlingRights: u8 {
        const NONE = 0;
        const WHITEKINGSIDE = 1 << 0;
        const WHITEQUEENSIDE = 1 << 1;
        const BLACKKINGSIDE = 1 << 2;
        const BLACKQUEENSIDE = 1 << 3;
        const ALL =
            Self::WHITEKINGSIDE.bits
            | Self::WHITEQUEENSIDE.bits
            | Self::BLACKKINGSIDE.bits
            | Self::BLACKQUEENSIDE.bits;
    }
}

impl CastlingRights {
    /// Single rights in notation order (`KQkq`).
    pub const EACH: [CastlingRights; 4] = [
        CastlingRights::WHITEKINGSIDE,
        CastlingRights::WHITEQUEENSIDE,
        CastlingRights::BLACKKINGSIDE,
        CastlingRights::BLACKQUEENSIDE,
    ];

    pub fn kingside(color: Color) -> CastlingRights {
        match color {
            White => CastlingRights::WHITEKINGSIDE,
            Black => CastlingRights::BLACKKINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastlingRights {
        match color {
            White => CastlingRights::WHITEQUEENSIDE,
            Black => CastlingRights::BLACKQUEENSIDE,
        }
    }

    /// King and rook home tiles a single right depends on.
    fn home_tiles(self) -> (Square, Square) {
        if self == CastlingRights::WHITEKINGSIDE {
            (White.king_home(), White.kingside_rook_home())
        } else if self == CastlingRights::WHITEQUEENSIDE {
            (White.king_home(), White.queenside_rook_home())
        } else if self == CastlingRights::BLACKKINGSIDE {
            (Black.king_home(), Black.kingside_rook_home())
        } else {
            (Black.king_home(), Black.queenside_rook_home())
        }
    }

    /// Rights lost when any of `touched` is vacated or entered.
    pub fn revoked_by(self, touched: &[Square]) -> CastlingRights {
        let mut revoked = CastlingRights::NONE;
        for right in CastlingRights::EACH {
            if !self.contains(right) {
                continue;
            }
            let (king, rook) = right.home_tiles();
            if touched.contains(&king) || touched.contains(&rook) {
                revoked |= right;
            }
        }
        revoked
    }

    pub fn from_fen_field(field: &str) -> Option<CastlingRights> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        for letter in field.chars() {
            let right = match letter {
                'K' => CastlingRights::WHITEKINGSIDE,
                'Q' => CastlingRights::WHITEQUEENSIDE,
                'k' => CastlingRights::BLACKKINGSIDE,
                'q' => CastlingRights::BLACKQUEENSIDE,
                _ => return None,
            };
            if rights.contains(right) {
                return None;
            }
            rights |= right;
        }
        if rights.is_empty() {
            None
        } else {
            Some(rights)
        }
    }

    pub fn to_fen_field(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        CastlingRights::EACH
            .iter()
            .zip(['K', 'Q', 'k', 'q'])
            .filter(|(right, _)| self.contains(**right))
            .map(|(_, letter)| letter)
            .collect()
    }
}

/// A complete, immutable chess position.
///
/// Besides the tiles it carries both sides' pseudo-legal move lists, the
/// castle candidates and the in-check flags, all computed once at build time.
#[derive(Debug, Clone)]
pub struct Position {
    tiles: [Tile; NUM_TILES],
    white_pieces: Vec<Piece>,
    black_pieces: Vec<Piece>,
    /// The pawn that just double stepped, capturable en passant
    en_passant_pawn: Option<Piece>,
    active_color: Color,
    /// Whether each side has castled at some point
    castled: [bool; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    players: [PlayerState; 2],
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Position {
        let mut builder = Builder::new();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in back_rank.into_iter().enumerate() {
            builder.set_piece(Piece::new(piece_type, Black, file, false));
            builder.set_piece(Piece::new(PieceType::Pawn, Black, 8 + file, false));
            builder.set_piece(Piece::new(PieceType::Pawn, White, 48 + file, false));
            builder.set_piece(Piece::new(piece_type, White, 56 + file, false));
        }
        builder.build()
    }

    /// Parses six-field position notation.
    pub fn read_fen(fen: &str) -> ChessResult<Position> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::notation(
                fen,
                format!("expected 6 fields, found {}", fields.len()),
            ));
        }

        let active_color = match fields[1] {
            "w" => White,
            "b" => Black,
            other => {
                return Err(ChessError::notation(fen, format!("unknown side to move '{other}'")))
            }
        };
        let rights = CastlingRights::from_fen_field(fields[2])
            .ok_or_else(|| {
                ChessError::notation(fen, format!("bad castling field '{}'", fields[2]))
            })?;

        let mut builder = Builder::new();
        let rows: Vec<&str> = fields[0].split('/').collect();
        if rows.len() != 8 {
            let reason = format!("expected 8 ranks, found {}", rows.len());
            return Err(ChessError::notation(fen, reason));
        }
        for (row, text) in rows.iter().enumerate() {
            let mut file = 0;
            for letter in text.chars() {
                if let Some(skip) = letter.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        let reason = format!("bad empty count '{letter}'");
                        return Err(ChessError::notation(fen, reason));
                    }
                    file += skip as usize;
                } else {
                    let (piece_type, color) = PieceType::from_letter(letter)?;
                    if file >= TILES_PER_ROW {
                        let reason = format!("rank {} is too long", 8 - row);
                        return Err(ChessError::notation(fen, reason));
                    }
                    let tile = row * TILES_PER_ROW + file;
                    let moved = initially_moved(piece_type, color, tile, rights);
                    builder.set_piece(Piece::new(piece_type, color, tile, moved));
                    file += 1;
                }
            }
            if file != TILES_PER_ROW {
                let reason = format!("rank {} does not span 8 files", 8 - row);
                return Err(ChessError::notation(fen, reason));
            }
        }

        let (white_kings, black_kings) = builder.king_counts();
        if white_kings != 1 || black_kings != 1 {
            return Err(ChessError::KingCount { white: white_kings, black: black_kings });
        }

        if fields[3] != "-" {
            let pawn = en_passant_pawn_for(&builder, fields[3], active_color)
                .ok_or_else(|| {
                    ChessError::notation(fen, format!("bad en passant target '{}'", fields[3]))
                })?;
            builder.set_en_passant_pawn(Some(pawn));
        }

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| ChessError::notation(fen, format!("bad halfmove clock '{}'", fields[4])))?;
        let fullmove_number = fields[5]
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ChessError::notation(fen, format!("bad fullmove number '{}'", fields[5]))
            })?;

        builder
            .set_active_color(active_color)
            .set_clocks(halfmove_clock, fullmove_number);
        Ok(builder.build())
    }

    /// Emits six-field position notation.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for file in 0..TILES_PER_ROW {
                match self.tiles[row * TILES_PER_ROW + file] {
                    Tile::Empty => empty += 1,
                    Tile::Occupied(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.letter());
                    }
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row < 7 {
                placement.push('/');
            }
        }

        let en_passant = self
            .en_passant_target()
            .map(square_name)
            .unwrap_or_else(|| "-".to_string());
        let side = if self.active_color.is_white() { "w" } else { "b" };

        format!(
            "{} {} {} {} {} {}",
            placement,
            side,
            self.castling_rights().to_fen_field(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    pub fn tile(&self, square: Square) -> Tile {
        self.tiles[square]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.tiles[square].piece()
    }

    pub fn tiles(&self) -> &[Tile; NUM_TILES] {
        &self.tiles
    }

    /// Pieces of one side in tile order.
    pub fn pieces(&self, color: Color) -> &[Piece] {
        match color {
            White => &self.white_pieces,
            Black => &self.black_pieces,
        }
    }

    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.white_pieces.iter().chain(self.black_pieces.iter())
    }

    pub fn king(&self, color: Color) -> Piece {
        // build() guarantees exactly one king per side
        *self
            .pieces(color)
            .iter()
            .find(|piece| piece.piece_type == PieceType::King)
            .unwrap_or_else(|| unreachable!("position without a {color} king"))
    }

    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.en_passant_pawn
    }

    /// The tile a capturing pawn lands on when taking en passant.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_pawn
            .and_then(|pawn| step(pawn.position, -pawn.color.pawn_direction()))
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Fingerprint under [`Zobrist::check`], computed on demand. Two
    /// positions sharing a hash but not this value are distinct.
    pub fn check_key(&self) -> u64 {
        Zobrist::check().hash_position(self)
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Half-moves played since the start of the game.
    pub fn game_ply(&self) -> u32 {
        self.fullmove_number.saturating_sub(1) * 2 + u32::from(self.active_color == Black)
    }

    pub fn is_castled(&self, color: Color) -> bool {
        self.castled[color.index()]
    }

    /// Rights derived from the board: an unmoved king on its home tile and
    /// an unmoved rook of the same side on the matching corner.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for color in Color::ALL {
            let king_home = match self.piece_at(color.king_home()) {
                Some(piece) => {
                    piece.piece_type == PieceType::King && piece.color == color && !piece.moved
                }
                None => false,
            };
            if !king_home {
                continue;
            }
            let unmoved_rook = |tile: Square| {
                matches!(self.piece_at(tile), Some(piece)
                    if piece.piece_type == PieceType::Rook && piece.color == color && !piece.moved)
            };
            if unmoved_rook(color.kingside_rook_home()) {
                rights |= CastlingRights::kingside(color);
            }
            if unmoved_rook(color.queenside_rook_home()) {
                rights |= CastlingRights::queenside(color);
            }
        }
        rights
    }

    pub fn player(&self, color: Color) -> Player<'_> {
        Player::new(self, color)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player<'_> {
        self.player(self.active_color)
    }

    pub(crate) fn player_state(&self, color: Color) -> &PlayerState {
        &self.players[color.index()]
    }

    /// Pseudo-legal moves of one side, castles excluded.
    pub fn pseudo_legal_moves(&self, color: Color) -> &[Move] {
        self.players[color.index()].pseudo_legal()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for file in 0..TILES_PER_ROW {
                match self.tiles[row * TILES_PER_ROW + file] {
                    Tile::Empty => write!(f, " -")?,
                    Tile::Occupied(piece) => write!(f, " {}", piece.letter())?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")
    }
}

/// Moved flag for a piece read from notation. Kings and rooks count as
/// unmoved only when a castling right in the notation depends on them.
fn initially_moved(
    piece_type: PieceType,
    color: Color,
    tile: Square,
    rights: CastlingRights,
) -> bool {
    let kingside = rights.contains(CastlingRights::kingside(color));
    let queenside = rights.contains(CastlingRights::queenside(color));
    match piece_type {
        PieceType::Pawn => row_of(tile) != color.pawn_home_row(),
        PieceType::King => !(tile == color.king_home() && (kingside || queenside)),
        PieceType::Rook => {
            !((tile == color.kingside_rook_home() && kingside)
                || (tile == color.queenside_rook_home() && queenside))
        }
        _ => false,
    }
}

/// Resolves the en passant field to the pawn that just double stepped.
fn en_passant_pawn_for(builder: &Builder, field: &str, active_color: Color) -> Option<Piece> {
    let target = parse_square(field).ok()?;
    let pawn_color = active_color.opponent();
    // target sits on the third rank from the double-stepping side
    let expected_row = match pawn_color {
        White => 5,
        Black => 2,
    };
    if row_of(target) != expected_row || builder.board_config[target].is_occupied() {
        return None;
    }
    let pawn_tile = step(target, pawn_color.pawn_direction())?;
    match builder.board_config[pawn_tile] {
        Tile::Occupied(piece)
            if piece.piece_type == PieceType::Pawn && piece.color == pawn_color =>
        {
            Some(piece)
        }
        _ => None,
    }
}

/// Staging area for a [`Position`]. Consumed by [`Builder::build`].
#[derive(Debug, Clone)]
pub struct Builder {
    board_config: [Tile; NUM_TILES],
    active_color: Color,
    en_passant_pawn: Option<Piece>,
    castled: [bool; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: Option<u64>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            board_config: [Tile::Empty; NUM_TILES],
            active_color: White,
            en_passant_pawn: None,
            castled: [false; 2],
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: None,
        }
    }

    /// Places a piece on its own tile, replacing whatever stood there.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        self.board_config[piece.position] = Tile::Occupied(piece);
        self
    }

    pub fn clear_tile(&mut self, square: Square) -> &mut Self {
        self.board_config[square] = Tile::Empty;
        self
    }

    pub fn set_active_color(&mut self, color: Color) -> &mut Self {
        self.active_color = color;
        self
    }

    pub fn set_en_passant_pawn(&mut self, pawn: Option<Piece>) -> &mut Self {
        self.en_passant_pawn = pawn;
        self
    }

    pub fn set_castled(&mut self, color: Color, castled: bool) -> &mut Self {
        self.castled[color.index()] = castled;
        self
    }

    pub fn set_clocks(&mut self, halfmove_clock: u32, fullmove_number: u32) -> &mut Self {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        self
    }

    /// Supplies a precomputed fingerprint, skipping the full hash at build.
    pub fn set_hash(&mut self, hash: u64) -> &mut Self {
        self.hash = Some(hash);
        self
    }

    fn king_counts(&self) -> (usize, usize) {
        let mut counts = (0, 0);
        for piece in self.board_config.iter().filter_map(Tile::piece) {
            if piece.piece_type == PieceType::King {
                match piece.color {
                    White => counts.0 += 1,
                    Black => counts.1 += 1,
                }
            }
        }
        counts
    }

    /// Freezes the staged configuration into a position.
    ///
    /// # Panics
    ///
    /// Panics unless the staged board holds exactly one king per side.
    pub fn build(self) -> Position {
        let (white_kings, black_kings) = self.king_counts();
        assert!(
            white_kings == 1 && black_kings == 1,
            "a position needs exactly one king per side, \
             found {white_kings} white and {black_kings} black"
        );

        let mut white_pieces = Vec::with_capacity(16);
        let mut black_pieces = Vec::with_capacity(16);
        for piece in self.board_config.iter().filter_map(Tile::piece) {
            match piece.color {
                White => white_pieces.push(piece),
                Black => black_pieces.push(piece),
            }
        }

        let mut position = Position {
            tiles: self.board_config,
            white_pieces,
            black_pieces,
            en_passant_pawn: self.en_passant_pawn,
            active_color: self.active_color,
            castled: self.castled,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: 0,
            players: Default::default(),
        };
        position.hash = match self.hash {
            Some(hash) => hash,
            None => Zobrist::global().hash_position(&position),
        };

        let white_moves = pseudo_legal_moves(&position, White);
        let black_moves = pseudo_legal_moves(&position, Black);
        let white = PlayerState::new(&position, White, white_moves.clone(), &black_moves);
        let black = PlayerState::new(&position, Black, black_moves, &white_moves);
        position.players = [white, black];
        position
    }
}
