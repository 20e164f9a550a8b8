use std::collections::HashSet;

use chrono::Utc;

use knightwatch::domain::fixture::MatchStatus;
use knightwatch::domain::personality::StyleTag;
use knightwatch::domain::PersonalityRegistry;
use knightwatch::port::outbound::notifier::ArenaEvent;
use knightwatch::port::outbound::store::MatchStore;
use knightwatch::testkit::arena::TestArena;
use knightwatch::testkit::config;
use knightwatch::testkit::domain::personality;

#[tokio::test]
async fn replenish_fills_inventory_then_idles() {
    let arena = TestArena::builder()
        .matchmaking(config::matchmaking(2, 5))
        .seed(17)
        .build();
    let now = Utc::now();

    let first = arena.matchmaker.replenish(now).await.unwrap();
    assert_eq!(first.started.len(), 2);
    assert_eq!(first.scheduled.len(), 5);
    assert_eq!(first.failed, 0);

    let live = arena.store.matches_by_status(MatchStatus::InProgress).await.unwrap();
    let upcoming = arena.store.matches_by_status(MatchStatus::Scheduled).await.unwrap();
    assert_eq!(live.len(), 2);
    assert_eq!(upcoming.len(), 5);
    for m in live.iter().chain(&upcoming) {
        assert_ne!(m.white(), m.black());
        assert!(arena.ctx.registry.get(m.white()).is_some());
        assert!(arena.ctx.registry.get(m.black()).is_some());
    }
    for m in &upcoming {
        let minutes = (m.start_time() - now).num_minutes();
        assert!((15..=1440).contains(&minutes), "start {minutes}m out");
    }

    let second = arena.matchmaker.replenish(now).await.unwrap();
    assert_eq!(second.created(), 0);

    assert_eq!(
        arena.events.count(|e| matches!(e, ArenaEvent::MatchStarted(_))),
        2
    );
    assert_eq!(
        arena.events.count(|e| matches!(e, ArenaEvent::MatchCreated(_))),
        5
    );
}

#[tokio::test]
async fn replenish_tops_up_after_completion() {
    let arena = TestArena::builder()
        .matchmaking(config::matchmaking(1, 0))
        .move_ceiling(4)
        .build();

    let first = arena.matchmaker.replenish(Utc::now()).await.unwrap();
    let played = first.started[0].id();
    arena.lifecycle.run_to_completion(played).await.unwrap();

    let second = arena.matchmaker.replenish(Utc::now()).await.unwrap();
    assert_eq!(second.started.len(), 1);
    assert_ne!(second.started[0].id(), played);
}

#[tokio::test]
async fn two_personality_roster_still_pairs() {
    let registry = PersonalityRegistry::new([
        personality(1, 1500, StyleTag::Classical),
        personality(2, 2700, StyleTag::Neural),
    ]);
    let arena = TestArena::builder()
        .registry(registry)
        .matchmaking(config::matchmaking(3, 0))
        .build();

    let report = arena.matchmaker.replenish(Utc::now()).await.unwrap();
    assert_eq!(report.started.len(), 3);
    let pairs: HashSet<_> = report
        .started
        .iter()
        .map(|m| (m.white().value(), m.black().value()))
        .collect();
    assert!(pairs.iter().all(|(w, b)| w != b));
}
