//! Board and Piece Codes
//!
//! The canonical board is a 64-entry array of piece codes and always stores
//! ground truth; observer-relative fog-of-war filtering happens in
//! `game::visibility` at read time, never here.
//!
//! Piece codes:
//! - 0 = empty
//! - 1-6 = white pawn, knight, bishop, rook, queen, king
//! - 7-12 = black pawn, knight, bishop, rook, queen, king

use serde::{Serialize, Deserialize};

use crate::core::square::{Square, BOARD_SQUARES};

/// Code for an empty square.
pub const EMPTY: u8 = 0;

/// Offset added to white piece kinds to get the black code.
pub const BLACK_OFFSET: u8 = 6;

/// Side color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Moves first, pawns advance toward row 7.
    White,
    /// Pawns advance toward row 0.
    Black,
}

impl Color {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Pawn advance direction as a row delta.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// Piece kind, numbered by the white piece codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    /// Code 1 / 7
    Pawn = 1,
    /// Code 2 / 8
    Knight = 2,
    /// Code 3 / 9
    Bishop = 3,
    /// Code 4 / 10
    Rook = 4,
    /// Code 5 / 11
    Queen = 5,
    /// Code 6 / 12
    King = 6,
}

impl PieceKind {
    /// Get kind from the white-range code 1-6.
    pub fn from_index(index: u8) -> Option<PieceKind> {
        match index {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A piece: kind plus color. Converts to/from the 1-12 wire codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Piece kind.
    pub kind: PieceKind,
    /// Owning side.
    pub color: Color,
}

impl Piece {
    /// Create a piece.
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Wire code in 1-12.
    #[inline]
    pub fn code(self) -> u8 {
        match self.color {
            Color::White => self.kind as u8,
            Color::Black => self.kind as u8 + BLACK_OFFSET,
        }
    }

    /// Decode a wire code; `None` for 0 (empty) or codes above 12.
    pub fn from_code(code: u8) -> Option<Piece> {
        match code {
            1..=6 => Some(Piece::new(PieceKind::from_index(code)?, Color::White)),
            7..=12 => Some(Piece::new(
                PieceKind::from_index(code - BLACK_OFFSET)?,
                Color::Black,
            )),
            _ => None,
        }
    }
}

/// The canonical game board: 64 piece codes, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "board_squares_serde")]
    squares: [u8; BOARD_SQUARES],
}

/// Serde plumbing for the fixed-size `[u8; 64]` board array.
///
/// serde's built-in impls only cover arrays up to length 32, so the derive on
/// `Board` needs an explicit `with` module. The wire format is a plain sequence
/// of `u8`, identical to what serde produces for shorter arrays.
mod board_squares_serde {
    use super::BOARD_SQUARES;
    use serde::de::{Error as _, SeqAccess, Visitor};
    use serde::ser::SerializeTuple;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(squares: &[u8; BOARD_SQUARES], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(BOARD_SQUARES)?;
        for byte in squares.iter() {
            tuple.serialize_element(byte)?;
        }
        tuple.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; BOARD_SQUARES], D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ArrayVisitor;

        impl<'de> Visitor<'de> for ArrayVisitor {
            type Value = [u8; BOARD_SQUARES];

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an array of {} bytes", BOARD_SQUARES)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut squares = [0u8; BOARD_SQUARES];
                for (i, slot) in squares.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| A::Error::invalid_length(i, &self))?;
                }
                Ok(squares)
            }
        }

        deserializer.deserialize_tuple(BOARD_SQUARES, ArrayVisitor)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// Back-rank kinds from file a to file h.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Empty board.
    pub fn empty() -> Self {
        Self { squares: [EMPTY; BOARD_SQUARES] }
    }

    /// Standard starting position.
    ///
    /// Row 0: white R N B Q K B N R, row 1: white pawns,
    /// row 6: black pawns, row 7: black back rank.
    pub fn initial() -> Self {
        let mut squares = [EMPTY; BOARD_SQUARES];

        for (col, kind) in BACK_RANK.iter().enumerate() {
            squares[col] = Piece::new(*kind, Color::White).code();
            squares[56 + col] = Piece::new(*kind, Color::Black).code();
        }
        for col in 0..8 {
            squares[8 + col] = Piece::new(PieceKind::Pawn, Color::White).code();
            squares[48 + col] = Piece::new(PieceKind::Pawn, Color::Black).code();
        }

        Self { squares }
    }

    /// Raw code at a square.
    #[inline]
    pub fn code_at(&self, sq: Square) -> u8 {
        self.squares[sq.index()]
    }

    /// Piece at a square, `None` if empty.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        Piece::from_code(self.squares[sq.index()])
    }

    /// Whether a square is occupied by either side.
    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.squares[sq.index()] != EMPTY
    }

    /// Place a piece (or clear with `None`).
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece.map(Piece::code).unwrap_or(EMPTY);
    }

    /// Apply a move: destination is overwritten (captures), source cleared.
    ///
    /// `placed` is the piece that lands on `to` — the moved piece, or the
    /// promoted piece for a terminal-rank pawn move.
    pub fn apply_move(&mut self, from: Square, to: Square, placed: Piece) {
        self.squares[to.index()] = placed.code();
        self.squares[from.index()] = EMPTY;
    }

    /// Remove every piece of one color. Used for timeout forfeits.
    pub fn clear_color(&mut self, color: Color) {
        for code in self.squares.iter_mut() {
            if Piece::from_code(*code).is_some_and(|p| p.color == color) {
                *code = EMPTY;
            }
        }
    }

    /// Iterate occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(i, code)| {
            let sq = Square::new(i as u8)?;
            Some((sq, Piece::from_code(*code)?))
        })
    }

    /// Raw code array (ground truth, unfiltered).
    pub fn codes(&self) -> &[u8; BOARD_SQUARES] {
        &self.squares
    }
}

// =============================================================================
// TESTS
// =============================================================================
