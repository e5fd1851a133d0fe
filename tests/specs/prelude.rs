//! Shared setup for the behavioral specs

pub use chrono::{Duration, NaiveDate, TimeZone, Utc};
pub use stays_adapters::{FakeCatalog, FakeInvoicer, FakeMessenger};
pub use stays_core::{
    Booking, BookingId, BookingStatus, DayStatus, EngineConfig, FakeClock, Month, Notice, Phase,
    ResourceId, SequentialIdGen, UserId,
};
pub use stays_engine::{Authorization, Engine, EngineError, RejectReason};
pub use stays_storage::BookingStore;
pub use std::sync::Arc;

pub type SpecEngine = Engine<FakeClock, SequentialIdGen, FakeCatalog, FakeMessenger, FakeInvoicer>;

pub const ALICE: UserId = UserId(100);
pub const BOB: UserId = UserId(200);
pub const APARTMENT: ResourceId = ResourceId(1);

pub struct World {
    pub engine: Arc<SpecEngine>,
    pub store: Arc<BookingStore>,
    pub clock: FakeClock,
    pub catalog: FakeCatalog,
    pub messenger: FakeMessenger,
    pub invoicer: FakeInvoicer,
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// World frozen at 2024-05-01 noon with one apartment at 100.0 per night
pub fn world() -> World {
    world_with(EngineConfig::default(), BookingStore::in_memory())
}

pub fn world_with(config: EngineConfig, store: BookingStore) -> World {
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let store = Arc::new(store);
    let catalog = FakeCatalog::new();
    catalog.add(APARTMENT, 100.0);
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
    World {
        engine,
        store,
        clock,
        catalog,
        messenger,
        invoicer,
    }
}

impl World {
    /// Drive a user to an AwaitingPayment hold on the apartment
    pub async fn hold(&self, user: UserId, check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        self.engine.select_resource(user, APARTMENT).await.unwrap();
        self.engine.pick_check_in(user, check_in).await.unwrap();
        self.engine.pick_check_out(user, check_out).await.unwrap();
        self.engine.confirm_selection(user).await.unwrap()
    }
}
