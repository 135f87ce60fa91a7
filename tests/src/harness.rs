//! Shared fixtures: a fully wired traceability stack with a controllable
//! clock and a subscribable bus.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rt_02_batch_store::InMemoryBatchStore;
use rt_03_transition_engine::adapters::bus::BusNotificationSink;
use rt_03_transition_engine::ports::inbound::{
    NewBatchRequest, TraceabilityApi, TransitionRequest,
};
use rt_03_transition_engine::{EngineConfig, EngineError, TimeSource, TraceabilityService};
use shared_bus::InMemoryEventBus;
use shared_types::{Batch, GeoLocation, Role, TransactionEvent, TransitionType};
use std::sync::{Arc, Mutex, Once};

/// Adjustable clock shared between a test and the service under test.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> DateTime<Utc> {
        MockClock::now(self)
    }
}

/// A wired stack: in-memory store, event bus, engine, mock clock.
pub struct Harness {
    pub service: Arc<TraceabilityService>,
    pub store: Arc<InMemoryBatchStore>,
    pub bus: Arc<InMemoryEventBus>,
    pub clock: Arc<MockClock>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();

        let store = Arc::new(InMemoryBatchStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(MockClock::starting_at(
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
        ));
        let service = Arc::new(TraceabilityService::with_parts(
            store.clone(),
            Arc::new(BusNotificationSink::new(bus.clone())),
            clock.clone(),
            EngineConfig::default(),
        ));

        Self {
            service,
            store,
            bus,
            clock,
        }
    }

    /// Register the canonical test batch: 50 kg of turmeric from F001 in
    /// Karnataka.
    pub async fn register_turmeric(&self) -> Batch {
        self.service
            .register_batch(
                "F001",
                Role::Farmer,
                NewBatchRequest {
                    batch_id: None,
                    herb_name: "Turmeric".to_string(),
                    quantity_kg: 50.0,
                    farmer_contact: "+91-9876543210".to_string(),
                    origin_location: GeoLocation::new(12.97, 77.59)
                        .with_address("Karnataka, India"),
                    photos: vec![],
                },
            )
            .await
            .expect("registration should succeed")
    }

    pub async fn transition(
        &self,
        batch_id: &str,
        actor_id: &str,
        role: Role,
        transition: TransitionType,
    ) -> Result<TransactionEvent, EngineError> {
        // Each step takes a little wall-clock time.
        self.clock.advance(Duration::minutes(5));
        self.service
            .request_transition(TransitionRequest::new(batch_id, actor_id, role, transition))
            .await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
