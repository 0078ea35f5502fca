#![forbid(unsafe_code)]

//! Scripted interaction traces and their deterministic replay.
//!
//! A trace is a JSON document listing host inputs in order. Replay feeds
//! each step to a fresh [`LayoutEngine`] and records what the engine
//! reported, so a trace plus its starting layout fully determines the
//! resulting document.
//!
//! # Schema
//!
//! ```json
//! {
//!   "steps": [
//!     {"step": "add", "kind": "chart"},
//!     {"step": "pointer", "phase": "down", "x": 40, "y": 40},
//!     {"step": "pointer", "phase": "move", "x": 640, "y": 40},
//!     {"step": "tick", "frames": 30},
//!     {"step": "pointer", "phase": "up", "x": 640, "y": 40},
//!     {"step": "viewport", "width": 600},
//!     {"step": "policy", "policy": "plain"},
//!     {"step": "remove", "id": "1"},
//!     {"step": "cancel"}
//!   ]
//! }
//! ```
//!
//! # Failure Modes
//!
//! - Removing an unknown id or ticking zero frames fails the replay with
//!   the step index; every other step is total (pointer events without a session are no-ops and
//!   are recorded as such).

use dashgrid_core::event::{PointerEvent, PointerPhase};
use dashgrid_layout::{
    CollisionPolicy, ComponentId, ComponentKind, EngineConfig, InteractionEffect, LayoutDocument, LayoutEngine,
    RecordingRenderer,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HarnessError, Result};

/// One scripted host input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    Add {
        kind: ComponentKind,
    },
    Remove {
        id: ComponentId,
    },
    Pointer {
        phase: PointerPhase,
        x: f64,
        y: f64,
    },
    Tick {
        #[serde(default = "one_frame")]
        frames: u32,
    },
    /// `canvas_width` defaults to the viewport width capped at the current
    /// canvas width.
    Viewport {
        width: f64,
        #[serde(default)]
        canvas_width: Option<f64>,
    },
    Policy {
        policy: CollisionPolicy,
    },
    Cancel,
}

fn one_frame() -> u32 {
    1
}

impl TraceStep {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Pointer { .. } => "pointer",
            Self::Tick { .. } => "tick",
            Self::Viewport { .. } => "viewport",
            Self::Policy { .. } => "policy",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// What a single step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Added { id: ComponentId },
    Removed { id: ComponentId },
    /// Last effect of the step; for multi-frame ticks, the final frame's.
    Effect { effect: InteractionEffect },
    Breakpoint { breakpoint: String },
    PolicySet { policy: CollisionPolicy },
    Cancelled { active: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Result of a full replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub records: Vec<StepRecord>,
    /// Number of renderer operations issued during the replay.
    pub render_ops: usize,
    pub document: LayoutDocument,
}

/// Replay `trace` on an engine built from `config`, optionally seeded with
/// `initial`.
pub fn replay(trace: &Trace, config: EngineConfig, initial: Option<&LayoutDocument>) -> Result<ReplayReport> {
    let mut engine = LayoutEngine::new(config, RecordingRenderer::new());
    if let Some(document) = initial {
        engine.import_layout(document)?;
    }
    engine.renderer_mut().clear_ops();

    let mut records = Vec::with_capacity(trace.steps.len());
    for (index, step) in trace.steps.iter().enumerate() {
        let outcome = apply(&mut engine, step, index)?;
        debug!(target: "dashgrid::harness", index, step = step.name(), "trace step applied");
        records.push(StepRecord {
            index,
            step: step.name().to_owned(),
            outcome,
        });
    }

    engine.cancel_interaction();
    Ok(ReplayReport {
        records,
        render_ops: engine.renderer().ops().len(),
        document: engine.export_layout(),
    })
}

fn apply(engine: &mut LayoutEngine<RecordingRenderer>, step: &TraceStep, index: usize) -> Result<StepOutcome> {
    let outcome = match step {
        TraceStep::Add { kind } => StepOutcome::Added {
            id: engine.add_component(*kind),
        },
        TraceStep::Remove { id } => match engine.remove_component(id) {
            Some(_) => StepOutcome::Removed { id: id.clone() },
            None => {
                return Err(HarnessError::TraceStep {
                    index,
                    message: format!("no component with id {id}"),
                });
            }
        },
        TraceStep::Pointer { phase, x, y } => StepOutcome::Effect {
            effect: engine.handle_pointer(PointerEvent::new(*phase, *x, *y)),
        },
        TraceStep::Tick { frames: 0 } => {
            return Err(HarnessError::TraceStep {
                index,
                message: "tick needs at least one frame".to_owned(),
            });
        }
        TraceStep::Tick { frames } => {
            let mut effect = engine.tick();
            for _ in 1..*frames {
                if effect.is_noop() {
                    break;
                }
                effect = engine.tick();
            }
            StepOutcome::Effect { effect }
        }
        TraceStep::Viewport { width, canvas_width } => {
            let canvas = canvas_width.unwrap_or_else(|| width.min(engine.metrics().canvas_width));
            engine.on_viewport_resize(*width, canvas);
            StepOutcome::Breakpoint {
                breakpoint: engine.breakpoint().as_str().to_owned(),
            }
        }
        TraceStep::Policy { policy } => {
            engine.set_policy(*policy);
            StepOutcome::PolicySet { policy: *policy }
        }
        TraceStep::Cancel => StepOutcome::Cancelled {
            active: engine.cancel_interaction(),
        },
    };
    Ok(outcome)
}
