//! End-to-end selection and cancellation specs

use crate::prelude::*;

#[tokio::test]
async fn a_hold_blocks_competing_ranges_until_and_after_confirmation() {
    let w = world();

    // Alice reaches AwaitingPayment for June 1-3
    let held = w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 3)).await;

    // Bob is blocked at the check-out guard before Alice even pays
    w.engine.select_resource(BOB, APARTMENT).await.unwrap();
    w.engine.pick_check_in(BOB, d(2024, 5, 30)).await.unwrap();
    let err = w
        .engine
        .pick_check_out(BOB, d(2024, 6, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RangeUnavailable { .. }));

    // Alice's payment authorizes
    assert_eq!(
        w.engine.authorize_payment(&held.id).await.unwrap(),
        Authorization::Accept
    );

    // Bob retries the same range and is still blocked
    let err = w
        .engine
        .pick_check_out(BOB, d(2024, 6, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::RangeUnavailable { .. }));

    // Bob sees the days as taken on the calendar
    let days = w
        .engine
        .render_calendar(APARTMENT, Month::new(2024, 6).unwrap(), BOB)
        .await
        .unwrap();
    assert_eq!(days[&d(2024, 6, 1)], DayStatus::Confirmed);
    assert_eq!(days[&d(2024, 6, 2)], DayStatus::Confirmed);
    assert_eq!(days[&d(2024, 6, 3)], DayStatus::Free);
}

#[tokio::test]
async fn soft_holds_do_not_block_anyone() {
    let w = world();

    // Alice has picked dates but not asked for the invoice yet
    w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
    w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
    w.engine
        .pick_check_out(ALICE, d(2024, 6, 3))
        .await
        .unwrap();

    // Bob can still take the same range
    w.engine.select_resource(BOB, APARTMENT).await.unwrap();
    w.engine.pick_check_in(BOB, d(2024, 6, 1)).await.unwrap();
    w.engine.pick_check_out(BOB, d(2024, 6, 3)).await.unwrap();

    // And Bob's calendar shows the days as free
    let days = w
        .engine
        .render_calendar(APARTMENT, Month::new(2024, 6).unwrap(), BOB)
        .await
        .unwrap();
    assert_eq!(days[&d(2024, 6, 1)], DayStatus::Free);
}

#[tokio::test]
async fn cancelling_a_confirmed_stay_refunds_and_frees_the_range() {
    let w = world_with(
        EngineConfig::default().with_refund_fraction(0.8),
        BookingStore::in_memory(),
    );

    // One night at 100.0
    let held = w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 2)).await;
    w.engine.authorize_payment(&held.id).await.unwrap();
    assert_eq!(held.amount, 100.0);

    let refund = w
        .engine
        .cancel_booking(ALICE, held.id.clone())
        .await
        .unwrap();
    assert_eq!(refund, 80.0);
    assert_eq!(
        w.store.get(&held.id).unwrap().status,
        BookingStatus::Cancelled
    );

    // Managers were notified with the refund amount
    assert!(w
        .messenger
        .manager_notices()
        .iter()
        .any(|n| matches!(n, Notice::BookingCancelled { refund, .. } if *refund == 80.0)));

    // The range is bookable again
    w.engine.select_resource(BOB, APARTMENT).await.unwrap();
    w.engine.pick_check_in(BOB, d(2024, 6, 1)).await.unwrap();
    w.engine.pick_check_out(BOB, d(2024, 6, 2)).await.unwrap();
}

#[tokio::test]
async fn aborting_mid_selection_leaves_no_trace_in_the_store() {
    let w = world();

    w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
    w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
    w.engine.abort_selection(ALICE).await.unwrap();

    assert_eq!(w.engine.phase(ALICE), Phase::Browsing);
    assert!(w.store.for_resource(APARTMENT).is_empty());
}

#[tokio::test]
async fn a_failed_invoice_dispatch_releases_the_selection() {
    let w = world();

    w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
    w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
    let pending = w
        .engine
        .pick_check_out(ALICE, d(2024, 6, 3))
        .await
        .unwrap();

    w.invoicer.fail_next();
    let err = w.engine.confirm_selection(ALICE).await.unwrap_err();
    assert!(matches!(err, EngineError::Invoice(_)));

    // No hold was left behind and the user starts over cleanly
    assert_eq!(
        w.store.get(&pending.id).unwrap().status,
        BookingStatus::Cancelled
    );
    assert_eq!(w.engine.phase(ALICE), Phase::Idle);
    w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 3)).await;
}

#[tokio::test]
async fn a_deleted_resource_stops_the_flow_before_any_hold() {
    let w = world();

    w.engine.select_resource(ALICE, APARTMENT).await.unwrap();
    w.engine.pick_check_in(ALICE, d(2024, 6, 1)).await.unwrap();
    w.catalog.remove(APARTMENT);

    let err = w
        .engine
        .pick_check_out(ALICE, d(2024, 6, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ResourceNotFound(_)));
    assert!(w.store.for_resource(APARTMENT).is_empty());
}

#[tokio::test]
async fn back_to_back_stays_share_a_turnover_day() {
    let w = world();

    let first = w.hold(ALICE, d(2024, 6, 1), d(2024, 6, 3)).await;
    w.engine.authorize_payment(&first.id).await.unwrap();

    // Bob checks in the day Alice checks out
    let second = w.hold(BOB, d(2024, 6, 3), d(2024, 6, 5)).await;
    assert_eq!(
        w.engine.authorize_payment(&second.id).await.unwrap(),
        Authorization::Accept
    );
}
