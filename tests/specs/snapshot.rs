//! Planned-restart specs: session snapshot and booking durability

use crate::prelude::*;

#[tokio::test]
async fn in_flight_selections_survive_a_planned_restart() {
    let dir = tempfile::tempdir().unwrap();

    let blob = {
        let w = world_with(EngineConfig::default(), BookingStore::open(dir.path()).unwrap());
        w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
        w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
        w.engine.save_state().unwrap()
    };

    // The blob is plain versioned JSON an operator can inspect
    let parsed: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    assert_eq!(parsed["version"], 1);

    let w = world_with(EngineConfig::default(), BookingStore::open(dir.path()).unwrap());
    assert_eq!(w.engine.phase(ALICE), Phase::Idle);
    w.engine.restore_state(&blob).unwrap();
    assert!(matches!(
        w.engine.phase(ALICE),
        Phase::PickingCheckOut { .. }
    ));

    // The restored session continues to a hold as if nothing happened
    w.engine.pick_check_out(ALICE, d(2024, 6, 3)).await.unwrap();
    w.engine.confirm_selection(ALICE).await.unwrap();
}

#[tokio::test]
async fn bookings_are_durable_without_any_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let held = {
        let w = world_with(EngineConfig::default(), BookingStore::open(dir.path()).unwrap());
        w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 3)).await
    };

    // Crash: no save_state. The hold still blocks Bob after restart.
    let w = world_with(EngineConfig::default(), BookingStore::open(dir.path()).unwrap());
    assert_eq!(
        w.store.get(&held.id).unwrap().status,
        BookingStatus::AwaitingPayment
    );
    w.engine.select_resource(BOB, APARTMENT).await.unwrap();
    w.engine.pick_check_in(BOB, d(2024, 5, 30)).await.unwrap();
    let err = w
        .engine
        .pick_check_out(BOB, d(2024, 6, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RangeUnavailable { .. }));

    // And its authorization still settles correctly
    assert_eq!(
        w.engine.authorize_payment(&held.id).await.unwrap(),
        Authorization::Accept
    );
}

#[tokio::test]
async fn idle_sessions_are_not_carried_across_restarts() {
    let w = world();
    w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 3)).await;
    // Alice's session is Idle after the invoice went out
    assert_eq!(w.engine.phase(ALICE), Phase::Idle);

    let blob = w.engine.save_state().unwrap();
    let w2 = world();
    w2.engine.restore_state(&blob).unwrap();
    assert_eq!(w2.engine.phase(ALICE), Phase::Idle);
}

#[tokio::test]
async fn a_restored_session_still_honors_the_cleanup_threshold() {
    let w = world();
    w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
    w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
    let blob = w.engine.save_state().unwrap();

    let w2 = world();
    w2.engine.restore_state(&blob).unwrap();
    w2.clock.advance(Duration::hours(25));
    let report = w2.engine.run_cleanup().await.unwrap();
    assert_eq!(report.reset_sessions, vec![ALICE]);
    assert_eq!(w2.engine.phase(ALICE), Phase::Idle);
}
