use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::dispatcher::DefaultGuard;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, layer::Context};

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub target: String,
    pub level: Level,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

/// Events recorded by [`capture_events`], shared with the capturing layer.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventLog {
    pub fn snapshot(&self) -> Vec<CapturedEvent> {
        self.lock().clone()
    }

    /// Events carrying `event = <name>`, in emission order.
    pub fn named(&self, name: &str) -> Vec<CapturedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.field("event") == Some(name))
            .cloned()
            .collect()
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.message() == Some(message))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Captures every tracing event emitted on the current thread until the
/// guard is dropped. Pair it with a current-thread runtime so spawned
/// tasks stay on the capturing thread.
pub fn capture_events() -> (EventLog, DefaultGuard) {
    let log = EventLog::default();
    let layer = TestEventLayer { log: log.clone() };
    let subscriber = tracing_subscriber::registry().with(layer);

    let guard = tracing::subscriber::set_default(subscriber);
    (log, guard)
}

struct TestEventLayer {
    log: EventLog,
}

impl<S> Layer<S> for TestEventLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        let mut visitor = FieldVisitor {
            fields: &mut fields,
        };
        event.record(&mut visitor);

        let meta = event.metadata();

        self.log.lock().push(CapturedEvent {
            target: meta.target().to_string(),
            level: *meta.level(),
            fields,
        });
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut Vec<(String, String)>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields
            .push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{value:?}")));
    }
}
