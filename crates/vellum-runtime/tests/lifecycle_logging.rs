#![forbid(unsafe_code)]

//! Lifecycle log events, captured with a `tracing-subscriber` layer.
//!
//! Run: `cargo test -p vellum-runtime --test lifecycle_logging`

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event as TraceEvent, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use vellum_core::{Duration, Event, Host, Size};
use vellum_runtime::Instance;
use vellum_runtime::hooks::{IntervalRender, ResizeActivity};

#[derive(Clone, Default)]
struct Capture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Capture {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &TraceEvent<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let (Some(message), Ok(mut messages)) = (visitor.0, self.messages.lock()) {
            messages.push(message);
        }
    }
}

fn captured(run: impl FnOnce()) -> Vec<String> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, run);
    capture.messages()
}

#[test]
fn resize_activity_logs_start_and_settle() {
    let messages = captured(|| {
        let host = Host::new();
        let instance = Instance::new();
        let _activity = ResizeActivity::new(&host, &instance);
        host.dispatch(&Event::Resize(Size::new(1, 1)));
        host.dispatch(&Event::Resize(Size::new(2, 2)));
        host.advance(Duration::from_secs(2));
    });

    let started = messages.iter().filter(|m| *m == "resize activity started").count();
    let settled = messages.iter().filter(|m| *m == "resize activity settled").count();
    assert_eq!((started, settled), (1, 1), "{messages:?}");
}

#[test]
fn interval_and_dispose_are_logged() {
    let messages = captured(|| {
        let host = Host::new();
        let instance = Instance::new();
        let _interval = IntervalRender::new(&host, &instance, Duration::from_millis(16));
        instance.dispose();
        instance.dispose();
    });

    assert!(messages.iter().any(|m| m == "interval render started"));
    assert_eq!(
        messages.iter().filter(|m| *m == "instance disposed").count(),
        1
    );
}
