//! Turn State Machine
//!
//! The transition functions that drive a game through
//! `AwaitingJoin -> Active (Commit <-> Reveal per side) -> Terminated`.
//!
//! Every transition validates completely before the first mutation, so a
//! rejected call leaves the game exactly as it found it. The only shared
//! resource across transitions is the used-hash set, and its check and
//! insert happen inside the same exclusive borrow.
//!
//! The opening round needs no special casing: `create` and `join` both
//! store the player's first commitment as a pending reveal, so after join
//! white reveals, then black reveals, and the normal commit-reveal cycle
//! continues from there.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::core::hash::CommitHash;
use crate::core::square::Square;
use crate::game::board::{Board, Color, Piece, PieceKind};
use crate::game::commitment::{random_opening_hash, MoveCommitment, SALT_LEN};
use crate::game::events::GameEvent;
use crate::game::rules::{RuleSet, RuleViolation};
use crate::game::state::{Game, GameId, GameStage, PlayerId, SideTurn, TerminationReason};

/// Host-supplied context for a transition.
///
/// The identity layer authenticates the caller; the ledger's serial
/// transaction ordering assigns the block height. Both arrive here as
/// plain data.
#[derive(Clone, Copy, Debug)]
pub struct TxContext {
    /// Authenticated caller identity.
    pub caller: PlayerId,
    /// Block height at which the host ordered this call.
    pub block: u64,
}

impl TxContext {
    /// Create a context.
    pub fn new(caller: PlayerId, block: u64) -> Self {
        Self { caller, block }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Blocks of inactivity after which the side to move forfeits to a
    /// timeout claim.
    pub reveal_deadline_blocks: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reveal_deadline_blocks: crate::REVEAL_DEADLINE_BLOCKS,
        }
    }
}

/// Promotion policy violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromotionError {
    /// Nonzero promo code on a move that does not reach the mover's
    /// terminal rank.
    #[error("no promo yet")]
    NotOnTerminalRank,

    /// Nonzero promo code on a non-pawn move.
    #[error("promo only for pawns")]
    NotAPawn,

    /// Promo code does not name a non-pawn, non-king piece of the moving
    /// color.
    #[error("bad promo code")]
    InvalidCode,
}

/// Categorical transition failures.
///
/// Every failure rejects the attempted transition before any state
/// mutation; none is fatal beyond the single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// No game exists under the requested identifier.
    #[error("game not found")]
    GameNotFound,

    /// Join attempted on a game that is not awaiting an opponent, or by
    /// its own creator.
    #[error("game not joinable")]
    NotJoinable,

    /// The game has terminated.
    #[error("game is over")]
    GameOver,

    /// Caller is neither player of this game.
    #[error("not a player in this game")]
    NotAPlayer,

    /// Caller is not the side to move.
    #[error("not your turn")]
    WrongTurn,

    /// The side to move is in the other phase of the commit-reveal cycle.
    #[error("wrong phase")]
    WrongPhase,

    /// Revealed fields do not reproduce the stored commitment.
    #[error("hash mismatch")]
    HashMismatch,

    /// Commitment hash was already used in this game.
    #[error("hash used")]
    HashReused,

    /// Square index outside 0-63.
    #[error("invalid square")]
    InvalidSquare,

    /// Promotion policy violation.
    #[error(transparent)]
    InvalidPromotion(#[from] PromotionError),

    /// Rejected by the active rule set.
    #[error(transparent)]
    IllegalMove(#[from] RuleViolation),

    /// Timeout claimed before the deadline lapsed.
    #[error("deadline not exceeded")]
    DeadlineNotExceeded,
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Create a game. The caller becomes white and their first-move commitment
/// is stored immediately; the game waits for an opponent.
///
/// With `want_random` the supplied hash is ignored and the engine derives
/// an opening hash from the creation parameters instead.
pub fn create(ctx: &TxContext, id: GameId, first_hash: CommitHash, want_random: bool) -> Game {
    let opening = if want_random {
        random_opening_hash(id, &ctx.caller, ctx.block)
    } else {
        first_hash
    };

    let mut used_hashes = BTreeSet::new();
    used_hashes.insert(opening);

    let mut game = Game {
        id,
        white: ctx.caller,
        black: None,
        board: Board::initial(),
        turn: Color::White,
        white_turn_state: SideTurn::PendingReveal(opening),
        black_turn_state: SideTurn::PendingCommit,
        stage: GameStage::AwaitingJoin,
        last_action_block: ctx.block,
        used_hashes,
        pending_events: Vec::new(),
    };

    game.push_event(GameEvent::Created {
        game_id: id,
        white: ctx.caller,
    });

    game
}

/// Join a waiting game as black, supplying black's first-move commitment.
pub fn join(
    ctx: &TxContext,
    game: &mut Game,
    first_hash: CommitHash,
    want_random: bool,
) -> Result<(), GameError> {
    if game.stage != GameStage::AwaitingJoin {
        return Err(GameError::NotJoinable);
    }
    if ctx.caller == game.white {
        return Err(GameError::NotJoinable);
    }

    let opening = if want_random {
        random_opening_hash(game.id, &ctx.caller, ctx.block)
    } else {
        first_hash
    };

    if !game.used_hashes.insert(opening) {
        return Err(GameError::HashReused);
    }

    game.black = Some(ctx.caller);
    game.black_turn_state = SideTurn::PendingReveal(opening);
    game.stage = GameStage::Active;
    game.last_action_block = ctx.block;

    game.push_event(GameEvent::Joined {
        game_id: game.id,
        black: ctx.caller,
    });

    Ok(())
}

/// Store a move commitment for the side to move.
pub fn commit(ctx: &TxContext, game: &mut Game, hash: CommitHash) -> Result<(), GameError> {
    if game.is_terminated() {
        return Err(GameError::GameOver);
    }

    let color = game.color_of(&ctx.caller).ok_or(GameError::NotAPlayer)?;
    if color != game.turn {
        return Err(GameError::WrongTurn);
    }
    if game.side_state(color) != SideTurn::PendingCommit {
        return Err(GameError::WrongPhase);
    }

    // Check-and-insert in one step: a hash ever stored in this game,
    // opening hashes included, is dead forever.
    if !game.used_hashes.insert(hash) {
        return Err(GameError::HashReused);
    }

    *game.side_state_mut(color) = SideTurn::PendingReveal(hash);
    game.last_action_block = ctx.block;

    game.push_event(GameEvent::MoveCommitted {
        game_id: game.id,
        by: color,
    });

    Ok(())
}

/// Reveal the committed move and apply it to the board.
///
/// Validates, in order: turn ownership, phase, commitment match, square
/// range, the active rule set, and promotion policy. Only then does the
/// board change, the turn flip, and the deadline reset.
pub fn reveal(
    ctx: &TxContext,
    game: &mut Game,
    rules: &dyn RuleSet,
    from: u8,
    to: u8,
    promo: u8,
    salt: [u8; SALT_LEN],
) -> Result<(), GameError> {
    if game.is_terminated() {
        return Err(GameError::GameOver);
    }

    let color = game.color_of(&ctx.caller).ok_or(GameError::NotAPlayer)?;
    if color != game.turn {
        return Err(GameError::WrongTurn);
    }
    let stored = match game.side_state(color) {
        SideTurn::PendingReveal(hash) => hash,
        SideTurn::PendingCommit => return Err(GameError::WrongPhase),
    };

    let from = Square::new(from).ok_or(GameError::InvalidSquare)?;
    let to = Square::new(to).ok_or(GameError::InvalidSquare)?;

    if !MoveCommitment::new(from, to, promo, salt).matches(&stored) {
        return Err(GameError::HashMismatch);
    }

    rules.validate_move(&game.board, color, from, to)?;
    let piece = game
        .board
        .piece_at(from)
        .ok_or(GameError::IllegalMove(RuleViolation::EmptySource))?;

    let placed = resolve_promotion(piece, to, promo)?;

    game.board.apply_move(from, to, placed);
    *game.side_state_mut(color) = SideTurn::PendingCommit;
    game.turn = color.opponent();
    game.last_action_block = ctx.block;

    game.push_event(GameEvent::MoveRevealed {
        game_id: game.id,
        by: color,
        from,
        to,
    });

    Ok(())
}

/// Claim a timeout win against a stalled opponent.
///
/// The claimant must be the opponent of the side to move, and the side to
/// move must have been silent for more than the configured deadline
/// window. The staller forfeits: all their pieces leave the board and the
/// game terminates.
pub fn claim_timeout(
    ctx: &TxContext,
    game: &mut Game,
    config: &EngineConfig,
) -> Result<(), GameError> {
    if game.is_terminated() {
        return Err(GameError::GameOver);
    }
    if game.stage == GameStage::AwaitingJoin {
        return Err(GameError::WrongPhase);
    }

    let color = game.color_of(&ctx.caller).ok_or(GameError::NotAPlayer)?;
    if color == game.turn {
        // The staller cannot claim against themselves
        return Err(GameError::WrongTurn);
    }

    if ctx.block <= game.last_action_block + config.reveal_deadline_blocks {
        return Err(GameError::DeadlineNotExceeded);
    }

    let staller = game.turn;
    game.board.clear_color(staller);
    game.stage = GameStage::Terminated {
        winner: ctx.caller,
        reason: TerminationReason::Timeout,
    };

    game.push_event(GameEvent::GameEnded {
        game_id: game.id,
        winner: ctx.caller,
        reason: TerminationReason::Timeout,
    });

    Ok(())
}

/// Resolve the piece that lands on the destination square.
///
/// - nonzero promo on a non-pawn move: `promo only for pawns`
/// - nonzero promo short of the terminal rank: `no promo yet`
/// - explicit promo must be a non-pawn, non-king piece of the mover's color
/// - pawn reaching the terminal rank with promo 0 auto-promotes to queen
fn resolve_promotion(piece: Piece, to: Square, promo: u8) -> Result<Piece, PromotionError> {
    if promo != 0 {
        if piece.kind != PieceKind::Pawn {
            return Err(PromotionError::NotAPawn);
        }
        if !to.is_terminal_rank(piece.color) {
            return Err(PromotionError::NotOnTerminalRank);
        }

        let promoted = Piece::from_code(promo).ok_or(PromotionError::InvalidCode)?;
        if promoted.color != piece.color
            || promoted.kind == PieceKind::Pawn
            || promoted.kind == PieceKind::King
        {
            return Err(PromotionError::InvalidCode);
        }
        return Ok(promoted);
    }

    if piece.kind == PieceKind::Pawn && to.is_terminal_rank(piece.color) {
        return Ok(Piece::new(PieceKind::Queen, piece.color));
    }

    Ok(piece)
}

// =============================================================================
// TESTS
// =============================================================================
