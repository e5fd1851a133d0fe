//! Cleanup sweep specs

use crate::prelude::*;

#[tokio::test]
async fn an_unpaid_hold_expires_after_the_threshold_and_frees_the_range() {
    let w = world();

    // Alice reaches AwaitingPayment and never pays
    let held = w.hold(ALICE, d(2024, 6, 10), d(2024, 6, 12)).await;

    // 25 hours later the sweep reclaims the hold
    w.clock.advance(Duration::hours(25));
    let report = w.engine.run_cleanup().await.unwrap();
    assert_eq!(report.expired_bookings, vec![held.id.clone()]);
    assert_eq!(
        w.store.get(&held.id).unwrap().status,
        BookingStatus::Expired
    );
    assert_eq!(w.engine.phase(ALICE), Phase::Idle);

    // The calendar reports the range free again
    let days = w
        .engine
        .render_calendar(APARTMENT, Month::new(2024, 6).unwrap(), BOB)
        .await
        .unwrap();
    assert_eq!(days[&d(2024, 6, 10)], DayStatus::Free);
    assert_eq!(days[&d(2024, 6, 11)], DayStatus::Free);

    // And Bob can book it
    let bob_hold = w.hold(BOB, d(2024, 6, 10), d(2024, 6, 12)).await;
    assert_eq!(
        w.engine.authorize_payment(&bob_hold.id).await.unwrap(),
        Authorization::Accept
    );
}

#[tokio::test]
async fn the_sweep_only_reclaims_bookings_older_than_the_threshold() {
    let w = world();

    let old = w.hold(ALICE, d(2024, 6, 10), d(2024, 6, 12)).await;
    w.clock.advance(Duration::hours(20));
    let young = w.hold(BOB, d(2024, 6, 20), d(2024, 6, 22)).await;
    w.clock.advance(Duration::hours(5));

    let report = w.engine.run_cleanup().await.unwrap();
    assert_eq!(report.expired_bookings, vec![old.id]);
    assert_eq!(
        w.store.get(&young.id).unwrap().status,
        BookingStatus::AwaitingPayment
    );
}

#[tokio::test]
async fn running_the_sweep_twice_changes_nothing_more() {
    let w = world();
    w.hold(ALICE, d(2024, 6, 10), d(2024, 6, 12)).await;
    w.clock.advance(Duration::hours(25));

    let first = w.engine.run_cleanup().await.unwrap();
    assert!(!first.is_empty());
    let second = w.engine.run_cleanup().await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn a_paid_booking_outlives_every_sweep() {
    let w = world();
    let held = w.hold(ALICE, d(2024, 6, 10), d(2024, 6, 12)).await;
    w.engine.authorize_payment(&held.id).await.unwrap();

    w.clock.advance(Duration::days(7));
    let report = w.engine.run_cleanup().await.unwrap();
    assert!(report.expired_bookings.is_empty());
    assert_eq!(
        w.store.get(&held.id).unwrap().status,
        BookingStatus::Confirmed
    );
}

#[tokio::test]
async fn expiry_notifies_the_abandoning_user() {
    let w = world();
    let held = w.hold(ALICE, d(2024, 6, 10), d(2024, 6, 12)).await;
    w.clock.advance(Duration::hours(25));
    w.engine.run_cleanup().await.unwrap();

    assert!(w
        .messenger
        .user_notices(ALICE)
        .iter()
        .any(|n| matches!(n, Notice::BookingExpired { booking_id } if *booking_id == held.id)));
}
