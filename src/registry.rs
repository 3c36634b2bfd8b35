//! Game Registry
//!
//! Allocates game identifiers, owns every game record, and serializes
//! intra-game transitions. Each game sits behind its own `RwLock`, so a
//! late reveal racing a timeout claim resolves by lock acquisition order:
//! one transition wins, the other fails cleanly against the updated state.
//! Cross-game operations never contend.
//!
//! This layer is the only non-deterministic part of the crate — all game
//! logic runs through `game::turn` under the game's write lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::core::hash::CommitHash;
use crate::core::square::BOARD_SQUARES;
use crate::game::commitment::SALT_LEN;
use crate::game::events::GameEvent;
use crate::game::rules::{CommitRules, RuleSet};
use crate::game::state::{Game, GameId, GameStatus, PlayerId};
use crate::game::turn::{self, EngineConfig, GameError, TxContext};
use crate::game::visibility::render_view;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Registry of all games, past and present.
///
/// Records are never removed; terminated games stay readable forever and
/// their identifiers are never reused.
pub struct GameRegistry {
    /// All games by identifier.
    games: RwLock<BTreeMap<GameId, Arc<RwLock<Game>>>>,
    /// Next identifier to allocate (sequential from 0).
    next_id: AtomicU64,
    /// Engine configuration.
    config: EngineConfig,
    /// Move-legality rules applied at reveal time.
    rules: Box<dyn RuleSet>,
    /// Event fan-out to subscribers.
    event_tx: broadcast::Sender<GameEvent>,
}

impl GameRegistry {
    /// Create a registry with default configuration and rules.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a registry with explicit configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_rules(config, Box::new(CommitRules))
    }

    /// Create a registry with explicit configuration and rule set.
    pub fn with_rules(config: EngineConfig, rules: Box<dyn RuleSet>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            games: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
            config,
            rules,
            event_tx,
        }
    }

    /// Subscribe to game events.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }

    /// Number of games ever created.
    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Create a game; the caller becomes white. Returns the new id.
    pub async fn create(
        &self,
        ctx: &TxContext,
        first_hash: CommitHash,
        want_random: bool,
    ) -> GameId {
        let id = GameId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut game = turn::create(ctx, id, first_hash, want_random);
        self.publish_events(&mut game);

        self.games.write().await.insert(id, Arc::new(RwLock::new(game)));

        info!(
            "Game {} created by {} (random opening: {})",
            id,
            hex::encode(&ctx.caller.as_bytes()[..4]),
            want_random
        );
        id
    }

    /// Join a waiting game as black.
    pub async fn join(
        &self,
        ctx: &TxContext,
        id: GameId,
        first_hash: CommitHash,
        want_random: bool,
    ) -> Result<(), GameError> {
        self.mutate(id, |game| turn::join(ctx, game, first_hash, want_random))
            .await?;
        info!(
            "Game {} joined by {}",
            id,
            hex::encode(&ctx.caller.as_bytes()[..4])
        );
        Ok(())
    }

    /// Store a move commitment for the side to move.
    pub async fn commit(
        &self,
        ctx: &TxContext,
        id: GameId,
        hash: CommitHash,
    ) -> Result<(), GameError> {
        self.mutate(id, |game| turn::commit(ctx, game, hash)).await?;
        debug!("Game {}: commitment {} stored", id, hex::encode(&hash[..8]));
        Ok(())
    }

    /// Reveal the committed move and apply it.
    pub async fn reveal(
        &self,
        ctx: &TxContext,
        id: GameId,
        from: u8,
        to: u8,
        promo: u8,
        salt: [u8; SALT_LEN],
    ) -> Result<(), GameError> {
        self.mutate(id, |game| {
            turn::reveal(ctx, game, self.rules.as_ref(), from, to, promo, salt)
        })
        .await?;
        debug!("Game {}: move {} -> {} revealed", id, from, to);
        Ok(())
    }

    /// Claim a timeout win against a stalled opponent.
    pub async fn claim_timeout(&self, ctx: &TxContext, id: GameId) -> Result<(), GameError> {
        self.mutate(id, |game| turn::claim_timeout(ctx, game, &self.config))
            .await?;
        info!(
            "Game {} ended by timeout claim from {}",
            id,
            hex::encode(&ctx.caller.as_bytes()[..4])
        );
        Ok(())
    }

    /// Caller-relative board view.
    ///
    /// Players of an active game get their fog-of-war view; once the game
    /// terminates the board is shown unfiltered. Non-participants are
    /// rejected.
    pub async fn view_board(
        &self,
        caller: &PlayerId,
        id: GameId,
    ) -> Result<[u8; BOARD_SQUARES], GameError> {
        let game = self.get_game(id).await?;
        let game = game.read().await;

        let color = game.color_of(caller).ok_or(GameError::NotAPlayer)?;
        if game.is_terminated() {
            return Ok(*game.board.codes());
        }
        Ok(render_view(&game.board, color))
    }

    /// Status snapshot for polling front-ends.
    pub async fn game_state(&self, id: GameId) -> Result<GameStatus, GameError> {
        let game = self.get_game(id).await?;
        let game = game.read().await;
        Ok(game.status(self.config.reveal_deadline_blocks))
    }

    /// Look up a game or fail with `GameNotFound`.
    async fn get_game(&self, id: GameId) -> Result<Arc<RwLock<Game>>, GameError> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::GameNotFound)
    }

    /// Run a transition under the game's write lock, then publish its
    /// events. The whole closure executes inside one exclusive borrow, so
    /// racing transitions on the same game serialize deterministically.
    async fn mutate<F>(&self, id: GameId, f: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Game) -> Result<(), GameError>,
    {
        let game = self.get_game(id).await?;
        let mut game = game.write().await;

        let result = f(&mut game);
        match &result {
            Ok(()) => self.publish_events(&mut game),
            Err(err) => warn!("Game {}: transition rejected: {}", id, err),
        }
        result
    }

    /// Drain and broadcast pending events. Send errors just mean nobody is
    /// subscribed.
    fn publish_events(&self, game: &mut Game) {
        for event in game.take_events() {
            let _ = self.event_tx.send(event);
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::square::Square;
    use crate::game::commitment::MoveCommitment;
    use crate::game::state::Phase;
    use crate::game::visibility::UNKNOWN_BLACK;

    const ALICE: PlayerId = PlayerId::new([1; 16]);
    const BOB: PlayerId = PlayerId::new([2; 16]);
    const CAROL: PlayerId = PlayerId::new([3; 16]);

    fn ctx(caller: PlayerId, block: u64) -> TxContext {
        TxContext::new(caller, block)
    }

    fn move_hash(from: u8, to: u8, promo: u8, salt: [u8; SALT_LEN]) -> CommitHash {
        MoveCommitment::new(
            Square::new(from).unwrap(),
            Square::new(to).unwrap(),
            promo,
            salt,
        )
        .hash()
    }

    /// Create + join a game with real opening commitments.
    async fn opened(registry: &GameRegistry) -> (GameId, [u8; SALT_LEN], [u8; SALT_LEN]) {
        let white_salt = [0xA1; SALT_LEN];
        let black_salt = [0xB2; SALT_LEN];

        let id = registry
            .create(&ctx(ALICE, 1), move_hash(12, 28, 0, white_salt), false)
            .await;
        registry
            .join(&ctx(BOB, 2), id, move_hash(52, 36, 0, black_salt), false)
            .await
            .unwrap();

        (id, white_salt, black_salt)
    }

    #[tokio::test]
    async fn test_sequential_ids_from_zero() {
        let registry = GameRegistry::new();

        let id0 = registry.create(&ctx(ALICE, 1), [1; 32], false).await;
        let id1 = registry.create(&ctx(CAROL, 2), [2; 32], false).await;

        assert_eq!(id0, GameId::new(0));
        assert_eq!(id1, GameId::new(1));
        assert_eq!(registry.game_count().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_game_not_found() {
        let registry = GameRegistry::new();
        let missing = GameId::new(42);

        assert_eq!(
            registry.game_state(missing).await,
            Err(GameError::GameNotFound)
        );
        assert_eq!(
            registry.view_board(&ALICE, missing).await,
            Err(GameError::GameNotFound)
        );
        assert_eq!(
            registry.commit(&ctx(ALICE, 1), missing, [0; 32]).await,
            Err(GameError::GameNotFound)
        );
        assert_eq!(
            registry.join(&ctx(BOB, 1), missing, [0; 32], false).await,
            Err(GameError::GameNotFound)
        );
    }

    #[tokio::test]
    async fn test_game_state_snapshot() {
        let registry = GameRegistry::new();
        let (id, _, _) = opened(&registry).await;

        let status = registry.game_state(id).await.unwrap();
        assert_eq!(status.phase, Phase::Reveal);
        assert!(status.turn_white);
        assert_eq!(status.white, ALICE);
        assert_eq!(status.black, Some(BOB));
        assert_eq!(status.deadline, 2 + crate::REVEAL_DEADLINE_BLOCKS);
        assert!(!status.terminated);
    }

    #[tokio::test]
    async fn test_full_round_through_registry() {
        let registry = GameRegistry::new();
        let (id, white_salt, black_salt) = opened(&registry).await;

        registry
            .reveal(&ctx(ALICE, 3), id, 12, 28, 0, white_salt)
            .await
            .unwrap();
        registry
            .reveal(&ctx(BOB, 4), id, 52, 36, 0, black_salt)
            .await
            .unwrap();

        let salt = [0xC3; SALT_LEN];
        registry
            .commit(&ctx(ALICE, 5), id, move_hash(11, 19, 0, salt))
            .await
            .unwrap();
        registry
            .reveal(&ctx(ALICE, 6), id, 11, 19, 0, salt)
            .await
            .unwrap();

        let status = registry.game_state(id).await.unwrap();
        assert_eq!(status.phase, Phase::Commit);
        assert!(!status.turn_white);
    }

    #[tokio::test]
    async fn test_views_are_caller_relative() {
        let registry = GameRegistry::new();
        let (id, _, _) = opened(&registry).await;

        let alice_view = registry.view_board(&ALICE, id).await.unwrap();
        let bob_view = registry.view_board(&BOB, id).await.unwrap();

        // Alice sees her army, Bob's hides behind sentinels
        assert_eq!(alice_view[4], 6); // her king
        assert_eq!(alice_view[60], UNKNOWN_BLACK);

        // And the reverse for Bob
        assert_eq!(bob_view[60], 12);
        assert_ne!(bob_view[4], 6);

        // Outsiders see nothing at all
        assert_eq!(
            registry.view_board(&CAROL, id).await,
            Err(GameError::NotAPlayer)
        );
    }

    #[tokio::test]
    async fn test_timeout_clears_staller_and_unfilters_view() {
        let registry = GameRegistry::new();
        let (id, white_salt, black_salt) = opened(&registry).await;

        registry
            .reveal(&ctx(ALICE, 3), id, 12, 28, 0, white_salt)
            .await
            .unwrap();
        registry
            .reveal(&ctx(BOB, 4), id, 52, 36, 0, black_salt)
            .await
            .unwrap();

        // White goes silent in Commit phase; Bob claims after the window
        assert_eq!(
            registry.claim_timeout(&ctx(BOB, 304), id).await,
            Err(GameError::DeadlineNotExceeded)
        );
        registry.claim_timeout(&ctx(BOB, 305), id).await.unwrap();

        let status = registry.game_state(id).await.unwrap();
        assert!(status.terminated);

        // Terminated game renders ground truth: no white piece anywhere
        let view = registry.view_board(&BOB, id).await.unwrap();
        let white_pieces = view.iter().filter(|c| (1..=6).contains(*c)).count();
        assert_eq!(white_pieces, 0);
        assert_eq!(view[4], 0); // white king square cleared
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let registry = GameRegistry::new();
        let mut events = registry.subscribe();

        let (id, white_salt, _) = opened(&registry).await;
        registry
            .reveal(&ctx(ALICE, 3), id, 12, 28, 0, white_salt)
            .await
            .unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            GameEvent::Created { game_id: id, white: ALICE }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            GameEvent::Joined { game_id: id, black: BOB }
        );
        assert!(matches!(
            events.recv().await.unwrap(),
            GameEvent::MoveRevealed { by: crate::game::board::Color::White, .. }
        ));
    }

    #[tokio::test]
    async fn test_games_are_independent() {
        let registry = GameRegistry::new();
        let (id0, white_salt, _) = opened(&registry).await;

        let carol_salt = [0xD5; SALT_LEN];
        let id1 = registry
            .create(&ctx(CAROL, 10), move_hash(12, 28, 0, carol_salt), false)
            .await;

        // Moves in game 0 do not disturb game 1
        registry
            .reveal(&ctx(ALICE, 11), id0, 12, 28, 0, white_salt)
            .await
            .unwrap();

        let status1 = registry.game_state(id1).await.unwrap();
        assert!(status1.turn_white);
        assert_eq!(status1.black, None);

        // The same hash is fine in a different game
        registry
            .join(&ctx(BOB, 12), id1, move_hash(12, 28, 0, white_salt), false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reveal_and_timeout_race_serializes() {
        let registry = Arc::new(GameRegistry::new());
        let (id, white_salt, black_salt) = opened(&registry).await;

        registry
            .reveal(&ctx(ALICE, 3), id, 12, 28, 0, white_salt)
            .await
            .unwrap();
        registry
            .reveal(&ctx(BOB, 4), id, 52, 36, 0, black_salt)
            .await
            .unwrap();

        let salt = [0xC3; SALT_LEN];
        registry
            .commit(&ctx(ALICE, 5), id, move_hash(11, 19, 0, salt))
            .await
            .unwrap();

        // Both transitions arrive past the deadline: the write lock orders
        // them, exactly one wins, and the loser fails without corrupting
        // anything
        let r1 = registry.clone();
        let r2 = registry.clone();
        let (reveal_result, timeout_result) = tokio::join!(
            async move { r1.reveal(&ctx(ALICE, 306), id, 11, 19, 0, salt).await },
            async move { r2.claim_timeout(&ctx(BOB, 306), id).await },
        );

        assert_ne!(reveal_result.is_ok(), timeout_result.is_ok());

        let status = registry.game_state(id).await.unwrap();
        if reveal_result.is_ok() {
            assert!(!status.terminated);
            assert!(!status.turn_white);
        } else {
            assert!(status.terminated);
        }
    }
}
