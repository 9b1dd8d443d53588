use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Result;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::{
    events::{EnrichedEvent, EventBus},
    queues::{FifoDropOldestQueue, IsolatedForwarder, QueueKind, StartupTasks},
    routes::{Route, RouteInbox, Routes},
    workers::{FifoInput, FifoReceiver, SubscriptionSpec, WorkerInputs, WorkerWiring},
};

pub struct BusConfig {
    pub session_id: Uuid,
    pub strict_routing: bool,
}

impl BusConfig {
    pub fn new_session(strict_routing: bool) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            strict_routing,
        }
    }
}

#[derive(Default)]
pub struct BusMetrics {
    pub unrouted_publish_total: AtomicU64,
}

impl BusMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unrouted(&self, _evt: &'static str) {
        self.unrouted_publish_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unrouted(&self) -> u64 {
        self.unrouted_publish_total.load(Ordering::Relaxed)
    }
}

fn validate(subs: &[SubscriptionSpec]) -> Result<()> {
    use std::collections::HashSet;

    let mut seen_subscribers: HashSet<&'static str> = HashSet::new();
    for s in subs {
        if s.subscriber_id.trim().is_empty() {
            anyhow::bail!("empty subscriber_id");
        }
        if !seen_subscribers.insert(s.subscriber_id) {
            anyhow::bail!("duplicate subscriber_id={}", s.subscriber_id);
        }
        if s.inputs.is_empty() {
            anyhow::bail!("subscriber_id={} has no inputs", s.subscriber_id);
        }

        let mut seen_inputs: HashSet<&'static str> = HashSet::new();
        for i in &s.inputs {
            if i.event_type.trim().is_empty() {
                anyhow::bail!("subscriber_id={} has empty event_type", s.subscriber_id);
            }
            if !seen_inputs.insert(i.event_type) {
                anyhow::bail!(
                    "subscriber_id={} has duplicate input event_type={}",
                    s.subscriber_id,
                    i.event_type
                );
            }

            match i.queue_kind {
                QueueKind::FifoDropOldest { capacity } => {
                    anyhow::ensure!(capacity > 0, "capacity must be > 0")
                }
                QueueKind::Isolated { output_buffer } => {
                    anyhow::ensure!(output_buffer > 0, "output_buffer must be > 0")
                }
            }
        }
    }
    Ok(())
}

pub struct EventBusBuilder {
    cfg: BusConfig,
    subs: Vec<SubscriptionSpec>,
}

impl EventBusBuilder {
    pub fn new(cfg: BusConfig) -> Self {
        Self {
            cfg,
            subs: Vec::new(),
        }
    }

    pub fn subscribe(mut self, s: SubscriptionSpec) -> Self {
        self.subs.push(s);
        self
    }

    pub fn build(self) -> Result<(EventBus, WorkerWiring, StartupTasks)> {
        validate(&self.subs)?;

        let mut routes: HashMap<&'static str, Vec<Route>> = HashMap::new();
        let mut wiring: HashMap<&'static str, WorkerInputs> = HashMap::new();
        let mut tasks = StartupTasks { tokio: Vec::new() };
        let metrics = Arc::new(BusMetrics::new());

        for spec in self.subs {
            let notify_any = Arc::new(Notify::new());
            let mut fifos = Vec::new();

            for input in spec.inputs {
                let drops_total = Arc::new(AtomicU64::new(0));

                match input.queue_kind {
                    QueueKind::FifoDropOldest { capacity } => {
                        let q =
                            Arc::new(FifoDropOldestQueue::new(capacity, Arc::clone(&notify_any)));
                        routes.entry(input.event_type).or_default().push(Route {
                            subscriber_id: spec.subscriber_id,
                            inbox: RouteInbox::FifoDropOldest(Arc::clone(&q)),
                            drops_total: Arc::clone(&drops_total),
                        });
                        fifos.push(FifoInput {
                            event_type: input.event_type,
                            receiver: FifoReceiver::FifoDropOldest(q.receiver()),
                        });
                    }
                    QueueKind::Isolated { output_buffer } => {
                        let (fwd, out_rx, drain_task) =
                            IsolatedForwarder::<Arc<EnrichedEvent>>::new(
                                output_buffer,
                                Arc::clone(&notify_any),
                            );
                        tasks.tokio.push(drain_task);

                        routes.entry(input.event_type).or_default().push(Route {
                            subscriber_id: spec.subscriber_id,
                            inbox: RouteInbox::Isolated(fwd),
                            drops_total: Arc::clone(&drops_total),
                        });

                        fifos.push(FifoInput {
                            event_type: input.event_type,
                            receiver: FifoReceiver::Isolated(out_rx),
                        });
                    }
                }
            }

            wiring.insert(
                spec.subscriber_id,
                WorkerInputs {
                    fifos,
                    notify_any,
                    fifo_index: 0,
                },
            );
        }

        let bus = EventBus::new(self.cfg, Routes { table: routes }, metrics);
        Ok((bus, WorkerWiring::new(wiring), tasks))
    }
}

#[cfg(test)]
mod tests {
    use std::{any::Any, time::SystemTime};

    use serde::Serialize;

    use super::*;
    use crate::{
        events::{Event, EventHeader, downcast_ref},
        workers::{InputSpec, WorkerItem},
    };

    #[derive(Serialize)]
    struct Ping {
        header: EventHeader,
        n: u32,
    }

    impl Ping {
        const EVENT_TYPE: &'static str = "test.ping";
    }

    impl Event for Ping {
        fn event_id(&self) -> Uuid {
            self.header.event_id
        }

        fn parent_ids(&self) -> &[Uuid] {
            &self.header.parent_ids
        }

        fn event_type(&self) -> &'static str {
            Self::EVENT_TYPE
        }

        fn timestamp(&self) -> SystemTime {
            self.header.timestamp
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn spec(id: &'static str, kind: QueueKind) -> SubscriptionSpec {
        SubscriptionSpec {
            subscriber_id: id,
            inputs: vec![InputSpec {
                event_type: Ping::EVENT_TYPE,
                queue_kind: kind,
            }],
        }
    }

    #[test]
    fn test_rejects_duplicate_subscriber() {
        let result = EventBusBuilder::new(BusConfig::new_session(false))
            .subscribe(spec("a", QueueKind::FifoDropOldest { capacity: 1 }))
            .subscribe(spec("a", QueueKind::FifoDropOldest { capacity: 1 }))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_capacity_and_empty_inputs() {
        let zero = EventBusBuilder::new(BusConfig::new_session(false))
            .subscribe(spec("a", QueueKind::FifoDropOldest { capacity: 0 }))
            .build();
        assert!(zero.is_err());

        let empty = EventBusBuilder::new(BusConfig::new_session(false))
            .subscribe(SubscriptionSpec {
                subscriber_id: "a",
                inputs: vec![],
            })
            .build();
        assert!(empty.is_err());
    }

    #[tokio::test]
    async fn test_publish_fans_out_to_every_subscriber() {
        let (bus, mut wiring, tasks) = EventBusBuilder::new(BusConfig::new_session(true))
            .subscribe(spec("fifo", QueueKind::FifoDropOldest { capacity: 2 }))
            .subscribe(spec("isolated", QueueKind::Isolated { output_buffer: 2 }))
            .build()
            .unwrap();
        for t in tasks.tokio {
            tokio::spawn(t);
        }

        bus.publish(Arc::new(Ping {
            header: EventHeader::root(),
            n: 3,
        }));

        for id in ["fifo", "isolated"] {
            let mut inputs = wiring.take(id).unwrap();
            let WorkerItem { event_type, event } = inputs.next().await;
            assert_eq!(event_type, Ping::EVENT_TYPE);
            assert_eq!(downcast_ref::<Ping>(&event.event).map(|p| p.n), Some(3));
        }
        assert!(wiring.take("fifo").is_none());
    }

    #[test]
    fn test_unrouted_publish_is_counted() {
        let (bus, _, _) = EventBusBuilder::new(BusConfig::new_session(false))
            .build()
            .unwrap();

        bus.publish(Arc::new(Ping {
            header: EventHeader::root(),
            n: 1,
        }));

        assert_eq!(bus.metrics().unrouted(), 1);
    }

    #[test]
    fn test_event_serializes_through_trait_object() {
        let event: Arc<dyn Event> = Arc::new(Ping {
            header: EventHeader::root(),
            n: 9,
        });

        let json = serde_json::to_value(&*event).unwrap();

        assert_eq!(json["n"], 9);
    }
}
