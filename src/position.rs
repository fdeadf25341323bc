//! Board adapter over the `chess` crate.
//!
//! `chess::Board` is an immutable value type without move history or move
//! clocks. `Position` layers both on top so that search code can explore the
//! tree with in-place `push`/`pop` pairs and ask the usual terminal questions
//! (checkmate, stalemate, insufficient material, 75-move rule, fivefold
//! repetition).

use crate::errors::{EngineError, Result};
use chess::{BitBoard, Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};
use std::fmt;
use std::str::FromStr;

/// Squares of the dark colour complex (a1 is dark)
const DARK_SQUARES: BitBoard = BitBoard(0xAA55_AA55_AA55_AA55);

/// Halfmove clock value at which the seventy-five-move rule ends the game
const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Why a position is game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

/// State saved by `push` and restored by `pop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    mv: ChessMove,
}

/// A game position with an undo stack.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<Snapshot>,
    /// Diagnostic counter, not part of the position's identity
    moves_applied: u64,
}

impl Position {
    /// Standard starting position
    pub fn new() -> Self {
        Self::from(Board::default())
    }

    /// Parse a FEN string. The move clocks are optional and default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let board = Board::from_str(fen)
            .map_err(|e| EngineError::InvalidPosition(format!("{fen}: {e:?}")))?;
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let halfmove_clock = fields
            .get(4)
            .map(|f| f.parse::<u32>())
            .transpose()?
            .unwrap_or(0);
        let fullmove_number = fields
            .get(5)
            .map(|f| f.parse::<u32>())
            .transpose()?
            .unwrap_or(1)
            .max(1);

        Ok(Self {
            board,
            halfmove_clock,
            fullmove_number,
            history: Vec::new(),
            moves_applied: 0,
        })
    }

    /// The underlying rules-engine board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Full six-field FEN
    pub fn fen(&self) -> String {
        format!(
            "{} {} {}",
            self.canonical_key(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Key identifying the position for caches and visited sets: piece
    /// placement, side to move, castling rights and en-passant target.
    pub fn canonical_key(&self) -> String {
        self.board
            .to_string()
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Number of moves applied through this value since construction,
    /// including moves that were later undone.
    pub fn moves_applied(&self) -> u64 {
        self.moves_applied
    }

    /// Number of plies currently on the undo stack
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.history.last().map(|snapshot| snapshot.mv)
    }

    /// Piece kind and colour on a square
    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let piece = self.board.piece_on(square)?;
        let color = self.board.color_on(square)?;
        Some((piece, color))
    }

    /// All squares holding a piece of the given kind and colour
    pub fn pieces(&self, piece: Piece, color: Color) -> BitBoard {
        *self.board.pieces(piece) & *self.board.color_combined(color)
    }

    /// Count of occupied squares
    pub fn piece_count(&self) -> u32 {
        self.board.combined().popcnt()
    }

    /// Every legal move, promotion variants included, in generator order
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        MoveGen::new_legal(&self.board).collect()
    }

    pub fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(&self.board).len()
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        self.board.legal(mv)
    }

    /// Apply a move in place. The move must be legal in this position.
    pub fn push(&mut self, mv: ChessMove) {
        debug_assert!(self.is_legal(mv), "push of illegal move {mv}");

        let resets_clock =
            self.board.piece_on(mv.get_source()) == Some(Piece::Pawn) || self.is_capture(mv);
        let black_moved = self.board.side_to_move() == Color::Black;

        self.history.push(Snapshot {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            mv,
        });

        self.board = self.board.make_move_new(mv);
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        if black_moved {
            self.fullmove_number += 1;
        }
        self.moves_applied += 1;
    }

    /// Apply a caller-supplied move, rejecting it if it is not legal here
    pub fn try_push(&mut self, mv: ChessMove) -> Result<()> {
        if !self.is_legal(mv) {
            return Err(EngineError::IllegalMove {
                mv: mv.to_string(),
                fen: self.fen(),
            });
        }
        self.push(mv);
        Ok(())
    }

    /// Undo the most recent move, restoring board and clocks exactly
    pub fn pop(&mut self) -> Option<ChessMove> {
        let snapshot = self.history.pop()?;
        self.board = snapshot.board;
        self.halfmove_clock = snapshot.halfmove_clock;
        self.fullmove_number = snapshot.fullmove_number;
        Some(snapshot.mv)
    }

    /// Squares holding pieces of `color` that attack `square`.
    ///
    /// Pinned pieces still count as attackers.
    pub fn attackers(&self, square: Square, color: Color) -> BitBoard {
        let board = &self.board;
        let occupied = *board.combined();
        let queens = *board.pieces(Piece::Queen);

        let knights = chess::get_knight_moves(square) & *board.pieces(Piece::Knight);
        let kings = chess::get_king_moves(square) & *board.pieces(Piece::King);
        let diagonal =
            chess::get_bishop_moves(square, occupied) & (*board.pieces(Piece::Bishop) | queens);
        let orthogonal =
            chess::get_rook_moves(square, occupied) & (*board.pieces(Piece::Rook) | queens);
        // A pawn of `color` attacks `square` from wherever a pawn of the
        // other colour standing on `square` would attack.
        let pawns = chess::get_pawn_attacks(square, !color, *board.pieces(Piece::Pawn));

        (knights | kings | diagonal | orthogonal | pawns) & *board.color_combined(color)
    }

    pub fn attacker_count(&self, square: Square, color: Color) -> u32 {
        self.attackers(square, color).popcnt()
    }

    /// Whether a move captures, en passant included
    pub fn is_capture(&self, mv: ChessMove) -> bool {
        let dest = mv.get_dest();
        if self.board.color_on(dest) == Some(!self.board.side_to_move()) {
            return true;
        }
        self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != dest.get_file()
    }

    pub fn gives_check(&self, mv: ChessMove) -> bool {
        self.board.make_move_new(mv).checkers().popcnt() > 0
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.board.status() == BoardStatus::Stalemate
    }

    /// Neither side can possibly deliver mate
    pub fn is_insufficient_material(&self) -> bool {
        self.has_insufficient_material(Color::White) && self.has_insufficient_material(Color::Black)
    }

    fn has_insufficient_material(&self, color: Color) -> bool {
        let board = &self.board;
        let ours = *board.color_combined(color);
        let theirs = *board.color_combined(!color);
        let pawns = *board.pieces(Piece::Pawn);
        let knights = *board.pieces(Piece::Knight);
        let bishops = *board.pieces(Piece::Bishop);
        let heavy = *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);

        if (ours & (pawns | heavy)).popcnt() > 0 {
            return false;
        }

        if (ours & knights).popcnt() > 0 {
            // A lone knight can only mate against non-king, non-queen help
            let helpers = theirs & !*board.pieces(Piece::King) & !*board.pieces(Piece::Queen);
            return ours.popcnt() <= 2 && helpers.popcnt() == 0;
        }

        if (ours & bishops).popcnt() > 0 {
            let same_complex =
                (bishops & DARK_SQUARES).popcnt() == 0 || (bishops & !DARK_SQUARES).popcnt() == 0;
            return same_complex && pawns.popcnt() == 0 && knights.popcnt() == 0;
        }

        true
    }

    fn repetition_count(&self) -> usize {
        let hash = self.board.get_hash();
        1 + self
            .history
            .iter()
            .filter(|snapshot| snapshot.board.get_hash() == hash)
            .count()
    }

    /// Reason the game is over, if it is
    pub fn outcome(&self) -> Option<Termination> {
        match self.board.status() {
            BoardStatus::Checkmate => return Some(Termination::Checkmate),
            BoardStatus::Stalemate => return Some(Termination::Stalemate),
            BoardStatus::Ongoing => {}
        }
        if self.is_insufficient_material() {
            Some(Termination::InsufficientMaterial)
        } else if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
            Some(Termination::SeventyFiveMoves)
        } else if self.repetition_count() >= 5 {
            Some(Termination::FivefoldRepetition)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Board> for Position {
    fn from(board: Board) -> Self {
        Self {
            board,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
            moves_applied: 0,
        }
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(fen: &str) -> Result<Self> {
        Self::from_fen(fen)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.history == other.history
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_KEY: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

    fn mv(src: Square, dest: Square) -> ChessMove {
        ChessMove::new(src, dest, None)
    }

    #[test]
    fn test_start_position_queries() {
        let position = Position::new();
        assert_eq!(position.canonical_key(), START_KEY);
        assert_eq!(position.fen(), format!("{START_KEY} 0 1"));
        assert_eq!(position.piece_count(), 32);
        assert_eq!(position.legal_move_count(), 20);
        assert_eq!(position.legal_moves().len(), 20);
        assert_eq!(
            position.piece_at(Square::E1),
            Some((Piece::King, Color::White))
        );
        assert_eq!(position.pieces(Piece::Pawn, Color::Black).popcnt(), 8);
        assert!(!position.is_game_over());
    }

    #[test]
    fn test_fen_clocks_parsed() {
        let position = Position::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
        )
        .unwrap();
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_number(), 2);
        assert_eq!(position.side_to_move(), Color::Black);
    }

    #[test]
    fn test_invalid_fen_rejected() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(EngineError::InvalidPosition(_))
        ));
        assert!(Position::from_fen("8/8/8/8/8/8/8/K6k w - - x 1").is_err());
    }

    #[test]
    fn test_push_pop_restores_everything() {
        let mut position = Position::new();
        let before = position.clone();

        position.push(mv(Square::G1, Square::F3));
        assert_eq!(position.halfmove_clock(), 1);
        position.push(mv(Square::E7, Square::E5));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 2);
        assert_eq!(position.last_move(), Some(mv(Square::E7, Square::E5)));

        assert_eq!(position.pop(), Some(mv(Square::E7, Square::E5)));
        assert_eq!(position.pop(), Some(mv(Square::G1, Square::F3)));
        assert_eq!(position.pop(), None);
        assert_eq!(position, before);
        assert_eq!(position.canonical_key(), before.canonical_key());
        assert_eq!(position.moves_applied(), 2);
    }

    #[test]
    fn test_try_push_rejects_illegal_move() {
        let mut position = Position::new();
        assert!(!position.is_legal(mv(Square::E2, Square::E5)));
        assert!(position.is_legal(mv(Square::E2, Square::E4)));
        let result = position.try_push(mv(Square::E2, Square::E5));
        assert!(matches!(result, Err(EngineError::IllegalMove { .. })));
        assert_eq!(position.ply(), 0);
        assert!(position.try_push(mv(Square::E2, Square::E4)).is_ok());
        assert_eq!(position.ply(), 1);
    }

    #[test]
    fn test_promotion_variants_are_distinct_moves() {
        let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promotions: Vec<_> = position
            .legal_moves()
            .into_iter()
            .filter(|m| m.get_source() == Square::A7)
            .collect();
        assert_eq!(promotions.len(), 4);
        assert!(promotions.iter().all(|m| m.get_promotion().is_some()));
    }

    #[test]
    fn test_attackers() {
        // White: Kg1, Rd1, Nc3, pawn e3. Black: Kg8, pawn d5
        let position = Position::from_fen("6k1/8/8/3p4/8/2N1P3/8/3R2K1 w - - 0 1").unwrap();
        let attackers = position.attackers(Square::D5, Color::White);
        assert_eq!(attackers.popcnt(), 2); // knight and rook, e3 pawn only hits d4/f4
        assert!((attackers & BitBoard::from_square(Square::C3)).popcnt() == 1);
        assert!((attackers & BitBoard::from_square(Square::D1)).popcnt() == 1);

        // The black pawn on d5 attacks e4 and c4
        assert_eq!(position.attacker_count(Square::E4, Color::Black), 1);
        assert_eq!(position.attacker_count(Square::C4, Color::Black), 1);
        assert_eq!(position.attacker_count(Square::D4, Color::Black), 0);
    }

    #[test]
    fn test_capture_and_check_detection() {
        let position =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        assert!(position.is_capture(mv(Square::E4, Square::D5)));
        assert!(!position.is_capture(mv(Square::E4, Square::E5)));

        let en_passant =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        assert!(en_passant.is_capture(mv(Square::E5, Square::F6)));

        let check = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(check.gives_check(mv(Square::A1, Square::A8)));
        assert!(!check.gives_check(mv(Square::A1, Square::A2)));
    }

    #[test]
    fn test_terminal_detection() {
        let mate =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(mate.is_checkmate());
        assert_eq!(mate.outcome(), Some(Termination::Checkmate));

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert_eq!(stalemate.outcome(), Some(Termination::Stalemate));

        let bare_kings = Position::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert_eq!(bare_kings.outcome(), Some(Termination::InsufficientMaterial));

        let knight = Position::from_fen("8/8/4k3/8/8/3KN3/8/8 w - - 0 1").unwrap();
        assert!(knight.is_insufficient_material());

        let rook = Position::from_fen("8/8/4k3/8/8/3KR3/8/8 w - - 0 1").unwrap();
        assert!(!rook.is_insufficient_material());

        let clock = Position::from_fen("8/8/4k3/8/8/3KR3/8/8 w - - 150 90").unwrap();
        assert_eq!(clock.outcome(), Some(Termination::SeventyFiveMoves));
    }

    #[test]
    fn test_fivefold_repetition() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        for _ in 0..4 {
            position.push(mv(Square::A1, Square::A2));
            position.push(mv(Square::E8, Square::D8));
            position.push(mv(Square::A2, Square::A1));
            position.push(mv(Square::D8, Square::E8));
        }
        assert_eq!(position.outcome(), Some(Termination::FivefoldRepetition));
        position.pop();
        assert!(!position.is_game_over());
    }
}
