//! Shared fixtures for engine unit tests

use crate::engine::Engine;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stays_adapters::{FakeCatalog, FakeInvoicer, FakeMessenger};
use stays_core::{Booking, EngineConfig, FakeClock, ResourceId, SequentialIdGen, UserId};
use stays_storage::BookingStore;
use std::sync::Arc;

pub(crate) type TestEngine =
    Engine<FakeClock, SequentialIdGen, FakeCatalog, FakeMessenger, FakeInvoicer>;

pub(crate) struct Harness {
    pub engine: Arc<TestEngine>,
    pub store: Arc<BookingStore>,
    pub clock: FakeClock,
    pub catalog: FakeCatalog,
    pub messenger: FakeMessenger,
    pub invoicer: FakeInvoicer,
}

/// 2024-05-01 noon; the June dates used in tests are all in the future
pub(crate) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub(crate) fn harness() -> Harness {
    harness_with_config(EngineConfig::default())
}

pub(crate) fn harness_with_config(config: EngineConfig) -> Harness {
    let clock = FakeClock::at(start_time());
    let store = Arc::new(BookingStore::in_memory());
    let catalog = FakeCatalog::new();
    catalog.add(ResourceId(1), 100.0);
    let messenger = FakeMessenger::new();
    let invoicer = FakeInvoicer::new();
    let engine = Arc::new(Engine::new(
        store.clone(),
        catalog.clone(),
        messenger.clone(),
        invoicer.clone(),
        clock.clone(),
        SequentialIdGen::new("bk"),
        config,
    ));
    Harness {
        engine,
        store,
        clock,
        catalog,
        messenger,
        invoicer,
    }
}

impl Harness {
    /// Drive a user to an AwaitingPayment hold on resource 1
    pub(crate) async fn hold(
        &self,
        user: UserId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Booking {
        self.engine.select_resource(user, ResourceId(1)).await.unwrap();
        self.engine.pick_check_in(user, check_in).await.unwrap();
        self.engine.pick_check_out(user, check_out).await.unwrap();
        self.engine.confirm_selection(user).await.unwrap()
    }

    /// Drive a user to a Pending soft hold on resource 1
    pub(crate) async fn soft_hold(
        &self,
        user: UserId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Booking {
        self.engine.select_resource(user, ResourceId(1)).await.unwrap();
        self.engine.pick_check_in(user, check_in).await.unwrap();
        self.engine.pick_check_out(user, check_out).await.unwrap()
    }
}
