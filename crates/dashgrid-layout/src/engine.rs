#![forbid(unsafe_code)]

//! The layout engine: one authoritative model, one optional interaction
//! session, one renderer.
//!
//! The host forwards pointer events (canvas-local pixels), viewport changes
//! and animation frames; the engine updates the model and tells the
//! [`Renderer`] what to show. Everything is `&mut self` driven from a single
//! thread.
//!
//! # Rendering contract
//!
//! - After any committed change every component is re-placed from the model,
//!   and border handles are re-sent if the model generation moved.
//! - While a drag or resize is in flight the active component is placed
//!   with [`Renderer::place_floating`] each frame; other components show the
//!   policy preview, recomputed only when the snap target changes.
//! - The ghost is shown while a drag or resize is in flight and hidden when
//!   it ends.
//!
//! # Invariants
//!
//! 1. Previews never touch the model; only commits, border drags, add,
//!    remove, import and breakpoint transitions do.
//! 2. While `Wide`, the master layout equals the model after every commit,
//!    add, remove, import and border drag.
//! 3. A session never outlives its component: removing or importing while
//!    one is active cancels it first.
//!
//! # Failure Modes
//!
//! Interaction never fails. Unknown targets and events without a session
//! return [`InteractionEffect::Noop`]. Only import can fail, and a rejected
//! document leaves the engine untouched.

use dashgrid_core::canvas::{CanvasMetrics, PixelPoint};
use dashgrid_core::event::{HorizontalEdge, PointerEvent, PointerPhase, ResizeDirection, VerticalEdge};
use tracing::{debug, trace};

use crate::border::{self, BorderHandle, BorderHandleCache};
use crate::component::{Component, ComponentId, ComponentKind, IdAllocator};
use crate::config::EngineConfig;
use crate::document::LayoutDocument;
use crate::error::DocumentError;
use crate::interaction::{
    InteractionEffect, InteractionState, MotionSession, NoopReason, PointerTarget,
};
use crate::model::GridModel;
use crate::policy::{self, CollisionPolicy, PolicyContext};
use crate::renderer::{Ghost, Renderer};
use crate::responsive::{Breakpoint, min_columns};
use crate::responsive_layout::{BreakpointTransition, ResponsiveState, rearrange_for};
use crate::solver;

#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Idle,
    Motion(MotionSession),
    Border(BorderHandle),
}

/// Grid layout engine driving a [`Renderer`].
#[derive(Debug)]
pub struct LayoutEngine<R: Renderer> {
    config: EngineConfig,
    metrics: CanvasMetrics,
    model: GridModel,
    ids: IdAllocator,
    responsive: ResponsiveState,
    handles: BorderHandleCache,
    session: Session,
    preview: Vec<Component>,
    renderer: R,
}

impl<R: Renderer> LayoutEngine<R> {
    /// An empty engine at the `Wide` breakpoint.
    #[must_use]
    pub fn new(config: EngineConfig, renderer: R) -> Self {
        Self {
            metrics: config.canvas,
            model: GridModel::new(),
            ids: IdAllocator::new(),
            responsive: ResponsiveState::new(config.breakpoints, f64::INFINITY),
            handles: BorderHandleCache::new(),
            session: Session::Idle,
            preview: Vec::new(),
            renderer,
            config,
        }
    }

    /// Start at the breakpoint for `viewport_width` (builder pattern). No
    /// transition runs; use [`on_viewport_resize`](Self::on_viewport_resize)
    /// once components exist.
    #[must_use]
    pub fn with_viewport(mut self, viewport_width: f64) -> Self {
        self.responsive = ResponsiveState::new(self.config.breakpoints, viewport_width);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub const fn metrics(&self) -> &CanvasMetrics {
        &self.metrics
    }

    #[inline]
    pub const fn model(&self) -> &GridModel {
        &self.model
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        self.model.components()
    }

    #[inline]
    pub const fn breakpoint(&self) -> Breakpoint {
        self.responsive.breakpoint()
    }

    /// The saved wide arrangement.
    #[inline]
    pub fn master_layout(&self) -> &[Component] {
        self.responsive.master()
    }

    #[inline]
    pub const fn policy(&self) -> CollisionPolicy {
        self.config.policy
    }

    pub fn set_policy(&mut self, policy: CollisionPolicy) {
        if self.config.policy != policy {
            debug!(target: "dashgrid::engine", from = %self.config.policy, to = %policy, "policy changed");
            self.config.policy = policy;
        }
    }

    #[inline]
    pub fn border_handles(&self) -> &[BorderHandle] {
        self.handles.handles()
    }

    /// Last policy preview of an in-flight drag or resize (empty otherwise).
    #[inline]
    pub fn preview(&self) -> &[Component] {
        &self.preview
    }

    #[inline]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        match &self.session {
            Session::Idle => InteractionState::Idle,
            Session::Motion(session) => session.state(),
            Session::Border(handle) => InteractionState::BorderDragging {
                first: handle.first.clone(),
                second: handle.second.clone(),
                orientation: handle.orientation,
            },
        }
    }

    /// Whether the host should schedule another [`tick`](Self::tick).
    #[must_use]
    pub fn wants_tick(&self) -> bool {
        matches!(&self.session, Session::Motion(s) if s.ticker().is_running())
    }

    fn ctx(&self) -> PolicyContext {
        PolicyContext::new(self.config.policy, self.breakpoint()).with_max_rows(self.config.max_scan_rows)
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Add a component of `kind` at its default size in the first free slot.
    pub fn add_component(&mut self, kind: ComponentKind) -> ComponentId {
        let mut id = self.ids.allocate();
        while self.model.contains(&id) {
            id = self.ids.allocate();
        }

        let mut component = Component::new(id.clone(), kind);
        solver::find_slot(
            self.model.components(),
            &mut component,
            self.breakpoint(),
            self.config.max_scan_rows,
        );
        debug!(
            target: "dashgrid::engine",
            id = %id,
            kind = %kind,
            col = component.rect.col,
            row = component.rect.row,
            "component added"
        );

        self.renderer.place(&id, component.rect);
        self.model.push(component);
        self.responsive.refresh_master_if_wide(&self.model);
        self.sync_handles();
        id
    }

    /// Remove a component; any session involving it is cancelled first.
    pub fn remove_component(&mut self, id: &ComponentId) -> Option<Component> {
        if self.state().involves(id) {
            self.cancel_interaction();
        }
        let removed = self.model.remove(id)?;
        self.responsive.forget(id);
        self.responsive.refresh_master_if_wide(&self.model);
        self.renderer.remove(id);
        self.sync_handles();
        debug!(target: "dashgrid::engine", id = %id, remaining = self.model.len(), "component removed");
        Some(removed)
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// The viewport or canvas width changed. Crossing a breakpoint cancels
    /// any session and rearranges the model; the canvas is always re-rendered.
    pub fn on_viewport_resize(
        &mut self,
        viewport_width: f64,
        canvas_width: f64,
    ) -> Option<BreakpointTransition> {
        self.metrics = self.metrics.with_canvas_width(canvas_width);
        if self.config.breakpoints.classify(viewport_width) != self.breakpoint() {
            self.cancel_interaction();
        }
        let transition = self
            .responsive
            .on_viewport(viewport_width, &mut self.model, self.config.max_scan_rows);
        self.render_all();
        self.sync_handles();
        transition
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Classify a canvas point: border handle first, then the topmost
    /// component's resize grips, then its body.
    #[must_use]
    pub fn hit_test(&self, point: PixelPoint) -> Option<PointerTarget> {
        if let Some(handle) = self
            .handles
            .handles()
            .iter()
            .find(|h| h.pixel_rect(&self.metrics).contains(point))
        {
            return Some(PointerTarget::Border {
                handle: handle.clone(),
            });
        }

        let grip = self.config.grip_size;
        let component = self
            .model
            .components()
            .iter()
            .rev()
            .find(|c| self.metrics.to_pixels(c.rect).contains(point))?;
        let px = self.metrics.to_pixels(component.rect);

        let horizontal = if point.x >= px.right() - grip {
            Some(HorizontalEdge::East)
        } else if point.x < px.x + grip {
            Some(HorizontalEdge::West)
        } else {
            None
        };
        let vertical = if point.y >= px.bottom() - grip {
            Some(VerticalEdge::South)
        } else if point.y < px.y + grip {
            Some(VerticalEdge::North)
        } else {
            None
        };

        let id = component.id.clone();
        Some(match ResizeDirection::from_edges(horizontal, vertical) {
            Some(direction) => PointerTarget::Grip { id, direction },
            None => PointerTarget::Body { id },
        })
    }

    /// Dispatch a raw pointer event; pointer-down is hit-tested.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InteractionEffect {
        match event.phase {
            PointerPhase::Down => match self.hit_test(event.position) {
                Some(target) => self.pointer_down(event.position, target),
                None if self.state().is_active() => InteractionEffect::noop(NoopReason::SessionAlreadyActive),
                None => InteractionEffect::noop(NoopReason::NoTarget),
            },
            PointerPhase::Move => self.pointer_move(event.position),
            PointerPhase::Up => self.pointer_up(),
        }
    }

    /// Start a session on `target`.
    pub fn pointer_down(&mut self, point: PixelPoint, target: PointerTarget) -> InteractionEffect {
        if self.state().is_active() {
            return InteractionEffect::noop(NoopReason::SessionAlreadyActive);
        }
        let pointer = self.metrics.to_grid_f(point);
        let tuning = self.config.tuning;

        let session = match target {
            PointerTarget::Body { id } => {
                let Some(start) = self.model.rect(&id) else {
                    return InteractionEffect::noop(NoopReason::UnknownComponent);
                };
                Session::Motion(MotionSession::drag(id, start, pointer, tuning))
            }
            PointerTarget::Grip { id, direction } => {
                let Some(component) = self.model.get(&id) else {
                    return InteractionEffect::noop(NoopReason::UnknownComponent);
                };
                let min_width = min_columns(component.kind, self.breakpoint());
                let start = component.rect;
                Session::Motion(MotionSession::resize(id, start, direction, min_width, pointer, tuning))
            }
            PointerTarget::Border { handle } => {
                if !self.model.contains(&handle.first) || !self.model.contains(&handle.second) {
                    return InteractionEffect::noop(NoopReason::UnknownComponent);
                }
                Session::Border(handle)
            }
        };

        if let Session::Motion(motion) = &session {
            self.preview = self.model.snapshot();
            self.renderer.show_ghost(&Ghost {
                id: motion.id().clone(),
                rect: motion.start(),
                collides: false,
            });
        }
        self.session = session;

        let state = self.state();
        debug!(target: "dashgrid::engine", state = %state, x = point.x, y = point.y, "session started");
        InteractionEffect::Started { state }
    }

    /// Feed a pointer position to the active session.
    pub fn pointer_move(&mut self, point: PixelPoint) -> InteractionEffect {
        let pointer = self.metrics.to_grid_f(point);
        let handle = match &mut self.session {
            Session::Idle => return InteractionEffect::noop(NoopReason::IdleWithoutSession),
            Session::Motion(motion) => {
                motion.pointer_moved(pointer);
                return InteractionEffect::Updated {
                    id: motion.id().clone(),
                    rect: motion.snap_rect(),
                    retargeted: false,
                };
            }
            Session::Border(handle) => handle.clone(),
        };

        let generation = self.model.generation();
        let cell = self.metrics.cell_at(point);
        if border::drag_border(&mut self.model, &handle, cell).is_none()
            || self.model.generation() == generation
        {
            return InteractionEffect::noop(NoopReason::BorderUnchanged);
        }

        for id in [&handle.first, &handle.second] {
            if let Some(rect) = self.model.rect(id) {
                self.renderer.place(id, rect);
            }
        }
        self.sync_handles();

        let rect = self.model.rect(&handle.first).unwrap_or_default();
        trace!(target: "dashgrid::engine", first = %handle.first, second = %handle.second, col = cell.0, row = cell.1, "border moved");
        InteractionEffect::Updated {
            id: handle.first,
            rect,
            retargeted: true,
        }
    }

    /// End the active session. Drag and resize commit through the policy.
    pub fn pointer_up(&mut self) -> InteractionEffect {
        let state = self.state();
        match std::mem::take(&mut self.session) {
            Session::Idle => InteractionEffect::noop(NoopReason::IdleWithoutSession),
            Session::Motion(mut motion) => {
                let target = motion.finish();
                let id = motion.id().clone();
                let arrangement = policy::commit(self.model.components(), &id, target, self.ctx());
                self.model.replace_all(arrangement);
                self.preview.clear();
                self.responsive.refresh_master_if_wide(&self.model);

                self.renderer.hide_ghost();
                self.render_all();
                self.sync_handles();

                let rect = self.model.rect(&id).unwrap_or(target);
                debug!(
                    target: "dashgrid::engine",
                    state = %state,
                    id = %id,
                    policy = %self.config.policy,
                    col = rect.col,
                    row = rect.row,
                    width = rect.width,
                    height = rect.height,
                    "session committed"
                );
                InteractionEffect::Committed { state, rect }
            }
            Session::Border(handle) => {
                self.responsive.refresh_master_if_wide(&self.model);
                self.sync_handles();
                let rect = self.model.rect(&handle.first).unwrap_or_default();
                debug!(target: "dashgrid::engine", first = %handle.first, second = %handle.second, "border drag ended");
                InteractionEffect::Committed { state, rect }
            }
        }
    }

    /// Drop the active session without committing. Returns `false` when idle.
    ///
    /// A drag or resize snaps everything back to the model; a border drag
    /// keeps the edits already applied.
    pub fn cancel_interaction(&mut self) -> bool {
        match std::mem::take(&mut self.session) {
            Session::Idle => false,
            Session::Motion(mut motion) => {
                motion.finish();
                self.preview.clear();
                self.renderer.hide_ghost();
                self.render_all();
                debug!(target: "dashgrid::engine", id = %motion.id(), "session cancelled");
                true
            }
            Session::Border(handle) => {
                self.responsive.refresh_master_if_wide(&self.model);
                debug!(target: "dashgrid::engine", first = %handle.first, "border drag cancelled");
                true
            }
        }
    }

    /// Advance the drag/resize animation by one frame.
    pub fn tick(&mut self) -> InteractionEffect {
        let motion = match &mut self.session {
            Session::Idle => return InteractionEffect::noop(NoopReason::IdleWithoutSession),
            Session::Border(_) => return InteractionEffect::noop(NoopReason::NotAnimating),
            Session::Motion(motion) => motion,
        };
        let Some(outcome) = motion.tick() else {
            return InteractionEffect::noop(NoopReason::NotAnimating);
        };
        let id = motion.id().clone();
        let snap = motion.snap_rect();
        let ghost_rect = motion.ghost_rect();
        let floating = motion.smoothed();

        if outcome.retargeted {
            self.preview = policy::preview(self.model.components(), &id, snap, self.ctx());
            for component in self.preview.iter().filter(|c| c.id != id) {
                self.renderer.place(&component.id, component.rect);
            }
        }
        self.renderer.place_floating(&id, floating);

        if outcome.ghost_moved {
            let collides = !solver::is_available(self.model.components(), ghost_rect, Some(&id));
            self.renderer.show_ghost(&Ghost {
                id: id.clone(),
                rect: ghost_rect,
                collides,
            });
        }

        trace!(
            target: "dashgrid::engine",
            id = %id,
            frame = outcome.frame,
            retargeted = outcome.retargeted,
            col = floating.col,
            row = floating.row,
            "tick"
        );
        InteractionEffect::Updated {
            id,
            rect: snap,
            retargeted: outcome.retargeted,
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Wide-equivalent arrangement: master rects where saved, live rects for
    /// anything added since.
    #[must_use]
    pub fn export_layout(&self) -> LayoutDocument {
        let master = self.responsive.master();
        if self.breakpoint().is_wide() || master.is_empty() {
            return LayoutDocument::from_components(self.model.components());
        }
        let mut arrangement = master.to_vec();
        arrangement.extend(
            self.model
                .components()
                .iter()
                .filter(|c| !master.iter().any(|m| m.id == c.id))
                .cloned(),
        );
        LayoutDocument::from_components(&arrangement)
    }

    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.export_layout().to_json_pretty()
    }

    /// Replace the whole collection. Validation happens first; on error the
    /// engine is untouched.
    pub fn import_layout(&mut self, document: &LayoutDocument) -> Result<(), DocumentError> {
        let components = document.to_components()?;
        self.cancel_interaction();

        let previous: Vec<ComponentId> = self.model.components().iter().map(|c| c.id.clone()).collect();
        self.model.replace_all(components.clone());
        self.ids.reseed(components.iter().map(|c| &c.id));
        self.responsive.set_master(components);

        let bp = self.breakpoint();
        if !bp.is_wide() {
            rearrange_for(&mut self.model, bp, self.config.max_scan_rows);
        }

        for id in previous.iter().filter(|id| !self.model.contains(id)) {
            self.renderer.remove(id);
        }
        self.render_all();
        self.sync_handles();
        debug!(
            target: "dashgrid::engine",
            components = self.model.len(),
            breakpoint = %bp,
            next_id = self.ids.peek(),
            "layout imported"
        );
        Ok(())
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = LayoutDocument::from_json_str(json)?;
        self.import_layout(&document)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render_all(&mut self) {
        for component in self.model.components() {
            self.renderer.place(&component.id, component.rect);
        }
    }

    fn sync_handles(&mut self) {
        if self.handles.refresh(&self.model) {
            self.renderer.border_handles_changed(self.handles.handles());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderOrientation;
    use crate::renderer::RecordingRenderer;
    use dashgrid_core::geometry::GridRect;

    fn engine() -> LayoutEngine<RecordingRenderer> {
        LayoutEngine::new(EngineConfig::default(), RecordingRenderer::new())
    }

    /// Center of a cell in canvas pixels, for the default 1200px canvas.
    fn cell_center(engine: &LayoutEngine<RecordingRenderer>, col: f64, row: f64) -> PixelPoint {
        let m = engine.metrics();
        PixelPoint::new(
            col * m.column_pitch() + m.origin + m.cell_width() / 2.0,
            row * m.row_pitch() + m.origin + m.cell_height / 2.0,
        )
    }

    #[test]
    fn add_places_first_fit_and_renders() {
        let mut e = engine();
        let a = e.add_component(ComponentKind::Primary);
        let b = e.add_component(ComponentKind::Primary);
        let c = e.add_component(ComponentKind::Primary);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("1", "2", "3"));
        assert_eq!(e.model().rect(&b), Some(GridRect::new(6, 0, 6, 6)));
        assert_eq!(e.renderer().placed(&c), Some(GridRect::new(0, 6, 6, 6)));
        assert_eq!(e.master_layout().len(), 3);
        assert!(!e.border_handles().is_empty());
    }

    #[test]
    fn hit_test_classifies_regions() {
        let mut e = engine();
        let id = e.add_component(ComponentKind::Primary);
        let px = e.metrics().to_pixels(GridRect::new(0, 0, 6, 6));

        let body = PixelPoint::new(px.x + px.width / 2.0, px.y + px.height / 2.0);
        assert_eq!(e.hit_test(body), Some(PointerTarget::Body { id: id.clone() }));

        let corner = PixelPoint::new(px.right() - 1.0, px.bottom() - 1.0);
        assert_eq!(
            e.hit_test(corner),
            Some(PointerTarget::Grip {
                id: id.clone(),
                direction: ResizeDirection::SouthEast
            })
        );

        let west = PixelPoint::new(px.x + 1.0, px.y + px.height / 2.0);
        assert_eq!(
            e.hit_test(west),
            Some(PointerTarget::Grip {
                id,
                direction: ResizeDirection::West
            })
        );
        assert_eq!(e.hit_test(PixelPoint::new(1190.0, 900.0)), None);
    }

    #[test]
    fn hit_test_prefers_border_handles() {
        let mut e = engine();
        e.add_component(ComponentKind::Primary);
        e.add_component(ComponentKind::Primary);
        let handle = e.border_handles()[0].clone();
        assert_eq!(handle.orientation, BorderOrientation::Vertical);
        let band = handle.pixel_rect(e.metrics());
        let point = PixelPoint::new(band.x + band.width / 2.0, band.y + band.height / 2.0);
        assert_eq!(e.hit_test(point), Some(PointerTarget::Border { handle }));
    }

    #[test]
    fn events_without_session_are_noops() {
        let mut e = engine();
        assert_eq!(e.tick(), InteractionEffect::noop(NoopReason::IdleWithoutSession));
        assert_eq!(
            e.pointer_move(PixelPoint::new(10.0, 10.0)),
            InteractionEffect::noop(NoopReason::IdleWithoutSession)
        );
        assert_eq!(e.pointer_up(), InteractionEffect::noop(NoopReason::IdleWithoutSession));
        assert_eq!(
            e.handle_pointer(PointerEvent::down(600.0, 900.0)),
            InteractionEffect::noop(NoopReason::NoTarget)
        );
        assert_eq!(
            e.pointer_down(PixelPoint::new(0.0, 0.0), PointerTarget::Body { id: "9".into() }),
            InteractionEffect::noop(NoopReason::UnknownComponent)
        );
        assert!(!e.wants_tick());
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let mut e = engine();
        let id = e.add_component(ComponentKind::Secondary);
        let start = cell_center(&e, 0.5, 1.0);
        assert!(matches!(
            e.pointer_down(start, PointerTarget::Body { id: id.clone() }),
            InteractionEffect::Started { .. }
        ));
        assert_eq!(
            e.pointer_down(start, PointerTarget::Body { id }),
            InteractionEffect::noop(NoopReason::SessionAlreadyActive)
        );
    }

    #[test]
    fn drag_commits_last_snap_target() {
        let mut e = engine().with_viewport(1280.0);
        e.set_policy(CollisionPolicy::Plain);
        let id = e.add_component(ComponentKind::Secondary);

        let from = cell_center(&e, 0.0, 0.0);
        e.pointer_down(from, PointerTarget::Body { id: id.clone() });
        assert!(e.wants_tick());
        assert_eq!(e.state(), InteractionState::Dragging { id: id.clone() });

        e.pointer_move(cell_center(&e, 4.0, 2.0));
        for _ in 0..10 {
            e.tick();
        }
        assert!(e.renderer().floating(&id).is_some());
        assert_eq!(e.renderer().ghost().map(|g| g.rect), Some(GridRect::new(4, 2, 2, 3)));

        let effect = e.pointer_up();
        assert_eq!(
            effect,
            InteractionEffect::Committed {
                state: InteractionState::Dragging { id: id.clone() },
                rect: GridRect::new(4, 2, 2, 3),
            }
        );
        assert!(!e.wants_tick());
        assert!(e.renderer().ghost().is_none());
        assert_eq!(e.renderer().placed(&id), Some(GridRect::new(4, 2, 2, 3)));
        assert_eq!(e.master_layout()[0].rect, GridRect::new(4, 2, 2, 3));
    }

    #[test]
    fn move_without_tick_does_not_retarget() {
        let mut e = engine();
        let id = e.add_component(ComponentKind::Secondary);
        e.pointer_down(cell_center(&e, 0.0, 0.0), PointerTarget::Body { id: id.clone() });
        e.pointer_move(cell_center(&e, 5.0, 0.0));
        assert_eq!(
            e.pointer_up(),
            InteractionEffect::Committed {
                state: InteractionState::Dragging { id },
                rect: GridRect::new(0, 0, 2, 3),
            }
        );
    }

    #[test]
    fn reflow_preview_leaves_model_untouched() {
        let mut e = engine();
        let a = e.add_component(ComponentKind::Primary);
        let b = e.add_component(ComponentKind::Primary);
        let generation = e.model().generation();

        e.pointer_down(cell_center(&e, 7.0, 1.0), PointerTarget::Body { id: b.clone() });
        e.pointer_move(cell_center(&e, 1.0, 1.0));
        e.tick();
        assert_eq!(e.model().generation(), generation);
        assert_eq!(e.model().rect(&a), Some(GridRect::new(0, 0, 6, 6)));
        assert!(!e.preview().is_empty());

        e.pointer_up();
        assert!(solver::find_collisions(e.components()).is_empty());
        assert!(e.preview().is_empty());
    }

    #[test]
    fn resize_from_grip_respects_breakpoint_minimum() {
        let mut e = engine().with_viewport(900.0);
        let id = e.add_component(ComponentKind::Primary);
        let start = cell_center(&e, 11.0, 5.0);
        e.pointer_down(
            start,
            PointerTarget::Grip {
                id: id.clone(),
                direction: ResizeDirection::East,
            },
        );
        e.pointer_move(cell_center(&e, 0.0, 5.0));
        e.tick();
        let InteractionEffect::Committed { rect, .. } = e.pointer_up() else {
            panic!("expected commit");
        };
        assert_eq!(rect.width, min_columns(ComponentKind::Primary, Breakpoint::Medium));
    }

    #[test]
    fn border_drag_updates_both_sides_immediately() {
        let mut e = engine();
        let a = e.add_component(ComponentKind::Primary);
        let b = e.add_component(ComponentKind::Primary);
        let handle = e.border_handles()[0].clone();
        e.pointer_down(PixelPoint::new(0.0, 0.0), PointerTarget::Border { handle });
        assert!(!e.wants_tick());
        assert_eq!(e.tick(), InteractionEffect::noop(NoopReason::NotAnimating));

        let effect = e.pointer_move(cell_center(&e, 4.0, 0.0));
        assert!(matches!(effect, InteractionEffect::Updated { retargeted: true, .. }));
        assert_eq!(e.model().rect(&a), Some(GridRect::new(0, 0, 4, 6)));
        assert_eq!(e.renderer().placed(&b), Some(GridRect::new(4, 0, 8, 6)));

        assert_eq!(
            e.pointer_move(cell_center(&e, 4.2, 0.0)),
            InteractionEffect::noop(NoopReason::BorderUnchanged)
        );
        assert!(matches!(e.pointer_up(), InteractionEffect::Committed { .. }));
        assert_eq!(e.master_layout()[0].rect, GridRect::new(0, 0, 4, 6));
    }

    #[test]
    fn remove_cancels_session_and_forgets_master() {
        let mut e = engine();
        let a = e.add_component(ComponentKind::Primary);
        e.add_component(ComponentKind::Secondary);
        e.pointer_down(cell_center(&e, 1.0, 1.0), PointerTarget::Body { id: a.clone() });
        assert!(e.remove_component(&a).is_some());
        assert_eq!(e.state(), InteractionState::Idle);
        assert_eq!(e.renderer().placed(&a), None);
        assert!(e.master_layout().iter().all(|c| c.id != a));
        assert!(e.remove_component(&a).is_none());
    }

    #[test]
    fn viewport_roundtrip_restores_wide_layout() {
        let mut e = engine();
        e.add_component(ComponentKind::Primary);
        e.add_component(ComponentKind::Secondary);
        e.add_component(ComponentKind::Secondary);
        let wide = e.components().to_vec();

        let t = e.on_viewport_resize(500.0, 480.0).unwrap();
        assert_eq!(t.to, Breakpoint::Narrow);
        let widths: Vec<u16> = e.components().iter().map(|c| c.rect.width).collect();
        assert_eq!(widths, [12, 6, 6]);
        assert_eq!(e.metrics().canvas_width, 480.0);

        assert!(e.on_viewport_resize(1300.0, 1200.0).is_some());
        for c in &wide {
            assert_eq!(e.model().rect(&c.id), Some(c.rect));
        }
    }

    #[test]
    fn export_when_narrow_uses_master() {
        let mut e = engine();
        e.add_component(ComponentKind::Secondary);
        e.on_viewport_resize(500.0, 480.0);
        let late = e.add_component(ComponentKind::Secondary);
        let doc = e.export_layout();
        assert_eq!(doc.components.len(), 2);
        assert_eq!(doc.components[0].position, GridRect::new(0, 0, 2, 3));
        assert_eq!(doc.components[1].id, late);
    }

    #[test]
    fn import_replaces_everything_and_reseeds_ids() {
        let mut e = engine();
        let old = e.add_component(ComponentKind::Primary);
        let json = r#"{"components":[
            {"id":"7","type":"kpi","position":{"col":0,"row":0,"width":2,"height":3}},
            {"id":"x","type":"chart","position":{"col":2,"row":0,"width":6,"height":6}}
        ],"version":"1.0.0","lastModified":"2024-01-01T00:00:00Z"}"#;
        e.import_json(json).unwrap();
        assert_eq!(e.components().len(), 2);
        assert_eq!(e.renderer().placed(&old), None);
        assert_eq!(e.master_layout().len(), 2);
        assert_eq!(e.add_component(ComponentKind::Secondary).as_str(), "8");
    }

    #[test]
    fn failed_import_leaves_engine_untouched() {
        let mut e = engine();
        e.add_component(ComponentKind::Primary);
        let before = e.components().to_vec();
        assert!(e.import_json(r#"{"components":"no"}"#).is_err());
        assert_eq!(e.components(), before.as_slice());
    }

    #[test]
    fn import_while_narrow_reflows_live_but_keeps_master() {
        let mut e = engine().with_viewport(500.0);
        let json = r#"{"components":[
            {"id":"1","type":"kpi","position":{"col":0,"row":0,"width":2,"height":3}},
            {"id":"2","type":"kpi","position":{"col":2,"row":0,"width":2,"height":3}}
        ]}"#;
        e.import_json(json).unwrap();
        assert_eq!(e.master_layout()[1].rect, GridRect::new(2, 0, 2, 3));
        assert_eq!(e.model().rect(&"2".into()), Some(GridRect::new(6, 0, 6, 3)));
        assert!(solver::find_collisions(e.components()).is_empty());
    }
}
