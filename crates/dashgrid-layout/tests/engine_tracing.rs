#![forbid(unsafe_code)]

//! Structured log events emitted by the engine and the layers below it.
//!
//! Installs a capturing layer as the thread-default subscriber and checks
//! that the documented targets, levels and fields show up.
//!
//! Run:
//!   cargo test -p dashgrid-layout --test engine_tracing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dashgrid_core::canvas::PixelPoint;
use dashgrid_core::geometry::GridRect;
use dashgrid_layout::{
    CollisionPolicy, Component, ComponentKind, EngineConfig, LayoutDocument, LayoutEngine, NullRenderer,
    PointerTarget,
};
use tracing_subscriber::layer::SubscriberExt;

// ── Capture ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn find(&self, target: &str, message: &str) -> Option<CapturedEvent> {
        self.events()
            .into_iter()
            .find(|e| e.target == target && e.message == message)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, EventCapture) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, capture)
}

fn engine(policy: CollisionPolicy) -> LayoutEngine<NullRenderer> {
    LayoutEngine::new(EngineConfig::default().with_policy(policy), NullRenderer)
}

fn cell(engine: &LayoutEngine<NullRenderer>, col: f64, row: f64) -> PixelPoint {
    let m = engine.metrics();
    PixelPoint::new(col * m.column_pitch() + m.origin + 20.0, row * m.row_pitch() + m.origin + 20.0)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[test]
fn committed_drag_logs_session_lifecycle() {
    let (_, logs) = capture(|| {
        let mut e = engine(CollisionPolicy::Reflow);
        let id = e.add_component(ComponentKind::Secondary);
        e.pointer_down(cell(&e, 0.0, 0.0), PointerTarget::Body { id });
        e.pointer_move(cell(&e, 4.0, 0.0));
        e.tick();
        e.pointer_up();
    });

    let started = logs.find("dashgrid::engine", "session started").expect("start logged");
    assert_eq!(started.level, tracing::Level::DEBUG);
    assert_eq!(started.fields.get("state").map(String::as_str), Some("dragging"));

    let committed = logs.find("dashgrid::engine", "session committed").expect("commit logged");
    assert_eq!(committed.level, tracing::Level::DEBUG);
    assert_eq!(committed.fields.get("id").map(String::as_str), Some("1"));
    assert_eq!(committed.fields.get("policy").map(String::as_str), Some("reflow"));
    assert!(committed.fields.contains_key("col"));

    assert!(logs.find("dashgrid::policy", "commit").is_some());
}

#[test]
fn plain_overlap_logs_relocation() {
    let (_, logs) = capture(|| {
        let mut e = engine(CollisionPolicy::Plain);
        let doc = LayoutDocument::from_components(&[
            Component::new("1", ComponentKind::Primary).with_rect(GridRect::new(0, 0, 6, 6)),
            Component::new("2", ComponentKind::Primary).with_rect(GridRect::new(6, 0, 6, 6)),
        ]);
        e.import_layout(&doc).unwrap();
        e.pointer_down(cell(&e, 7.0, 1.0), PointerTarget::Body { id: "2".into() });
        e.pointer_move(cell(&e, 5.0, 1.0));
        e.tick();
        e.pointer_up();
    });

    let relocated = logs
        .find("dashgrid::policy", "plain commit overlapped; relocated")
        .expect("relocation logged");
    assert_eq!(relocated.level, tracing::Level::DEBUG);
    assert_eq!(relocated.fields.get("id").map(String::as_str), Some("2"));
    assert_eq!(relocated.fields.get("col").map(String::as_str), Some("6"));
}

#[test]
fn exhausted_scan_warns() {
    let config = EngineConfig {
        max_scan_rows: 1,
        ..EngineConfig::default()
    };
    let (_, logs) = capture(|| {
        let mut e = LayoutEngine::new(config, NullRenderer);
        for _ in 0..3 {
            e.add_component(ComponentKind::Primary);
        }
    });

    let warned = logs
        .find("dashgrid::solver", "no free slot; keeping previous position")
        .expect("warning logged");
    assert_eq!(warned.level, tracing::Level::WARN);
    assert_eq!(warned.fields.get("id").map(String::as_str), Some("3"));
    assert_eq!(warned.fields.get("max_rows").map(String::as_str), Some("1"));
}

#[test]
fn breakpoint_change_logs_transition() {
    let (_, logs) = capture(|| {
        let mut e = engine(CollisionPolicy::Reflow);
        e.add_component(ComponentKind::Primary);
        e.on_viewport_resize(600.0, 580.0);
        e.on_viewport_resize(610.0, 590.0);
    });

    let transitions: Vec<CapturedEvent> = logs
        .events()
        .into_iter()
        .filter(|e| e.target == "dashgrid::responsive" && e.message == "breakpoint transition")
        .collect();
    assert_eq!(transitions.len(), 1, "same-breakpoint resize must stay quiet");
    assert_eq!(transitions[0].fields.get("from").map(String::as_str), Some("wide"));
    assert_eq!(transitions[0].fields.get("to").map(String::as_str), Some("narrow"));
}

#[test]
fn idle_engine_is_silent_on_stray_events() {
    let (_, logs) = capture(|| {
        let mut e = engine(CollisionPolicy::Reflow);
        e.pointer_move(PixelPoint::new(10.0, 10.0));
        e.pointer_up();
        e.tick();
    });
    assert!(logs.events().is_empty(), "{:?}", logs.events());
}
