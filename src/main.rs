//! BattleChess Demo Driver
//!
//! Drives a scripted two-player game through the registry: create, join,
//! the two opening reveals, a full commit-reveal round, a premature
//! timeout claim, and both players' fog-of-war views.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use battlechess::{
    game::commitment::SALT_LEN, GameError, GameRegistry, MoveCommitment, PlayerId, Square,
    TxContext, REVEAL_DEADLINE_BLOCKS, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("BattleChess Engine v{}", VERSION);
    info!("Reveal deadline: {} blocks", REVEAL_DEADLINE_BLOCKS);

    demo_game().await
}

/// Hash a move the way a client would before committing.
fn move_hash(from: u8, to: u8, promo: u8, salt: [u8; SALT_LEN]) -> battlechess::CommitHash {
    let from = Square::new(from).expect("demo square in range");
    let to = Square::new(to).expect("demo square in range");
    MoveCommitment::new(from, to, promo, salt).hash()
}

async fn demo_game() -> Result<()> {
    info!("=== Starting Demo Game ===");

    let registry = GameRegistry::new();
    let mut events = registry.subscribe();

    let alice = PlayerId::new([0xA1; 16]);
    let bob = PlayerId::new([0xB0; 16]);

    // Alice creates the game, pre-committing e2-e4
    let alice_salt = [0x11; SALT_LEN];
    let id = registry
        .create(&TxContext::new(alice, 1), move_hash(12, 28, 0, alice_salt), false)
        .await;

    // Bob joins, pre-committing e7-e5
    let bob_salt = [0x22; SALT_LEN];
    registry
        .join(&TxContext::new(bob, 2), id, move_hash(52, 36, 0, bob_salt), false)
        .await?;

    // Opening reveals: white first, then black
    registry
        .reveal(&TxContext::new(alice, 3), id, 12, 28, 0, alice_salt)
        .await?;
    registry
        .reveal(&TxContext::new(bob, 4), id, 52, 36, 0, bob_salt)
        .await?;

    // A normal round: white commits, then reveals
    let salt2 = [0x33; SALT_LEN];
    registry
        .commit(&TxContext::new(alice, 5), id, move_hash(6, 21, 0, salt2))
        .await?;
    registry
        .reveal(&TxContext::new(alice, 6), id, 6, 21, 0, salt2)
        .await?;

    let status = registry.game_state(id).await?;
    info!(
        "Game {} status: {}",
        id,
        serde_json::to_string(&status)?
    );

    // A premature timeout claim bounces without touching the game
    match registry.claim_timeout(&TxContext::new(alice, 7), id).await {
        Err(GameError::DeadlineNotExceeded) | Err(GameError::WrongTurn) => {
            info!("Premature timeout claim rejected, as it should be")
        }
        other => info!("Unexpected timeout claim outcome: {:?}", other),
    }

    // Each player sees their own army fully, the opponent's only in range
    print_view("Alice", &registry.view_board(&alice, id).await?);
    print_view("Bob", &registry.view_board(&bob, id).await?);

    while let Ok(event) = events.try_recv() {
        info!("Event: {:?}", event);
    }

    Ok(())
}

/// Log a 64-square view, rank 8 at the top.
fn print_view(who: &str, view: &[u8; 64]) {
    info!("{}'s view:", who);
    for row in (0..8).rev() {
        let line: Vec<String> = (0..8)
            .map(|col| format!("{:2}", view[row * 8 + col]))
            .collect();
        info!("  {}", line.join(" "));
    }
}
