#![forbid(unsafe_code)]

//! First-fit placement and reflow over an arrangement slice.
//!
//! Every function here is pure with respect to its `arrangement` argument;
//! callers decide what to do with the result.
//!
//! # Algorithm
//!
//! [`find_slot`] scans rows `0..max_rows` and, within each row, columns
//! `0..=GRID_COLUMNS - width`, returning the first cell where the component
//! fits without overlapping anything. A reflow pass stable-sorts by
//! `(row, col)` and re-places each component against the already-placed
//! prefix, which packs the arrangement upward and leftward.
//!
//! A single pass can leave a component that was placed late sitting at an
//! earlier `(row, col)` than one placed before it, so a second pass would
//! visit them in a different order. [`reflow`] therefore repeats passes
//! until the arrangement stops changing (bounded by [`MAX_REFLOW_PASSES`]).
//!
//! # Invariants
//!
//! 1. After [`reflow`] no two components overlap, provided every component
//!    found a slot within `max_rows`.
//! 2. [`reflow`] is idempotent: reflowing its own output changes nothing.
//! 3. Placement is deterministic in input order.
//!
//! # Failure Modes
//!
//! - No slot within `max_rows`: the component keeps its previous origin and
//!   a warning is logged. Overlap may then remain.
//! - No fixed point within [`MAX_REFLOW_PASSES`]: the last pass is returned
//!   and a warning is logged.

use dashgrid_core::geometry::{GRID_COLUMNS, GridRect};
use tracing::{trace, warn};

use crate::component::{Component, ComponentId};
use crate::responsive::{Breakpoint, min_columns};

/// Rows scanned by [`find_slot`] unless configured otherwise.
pub const MAX_SCAN_ROWS: u16 = 100;

/// Upper bound on reflow passes while searching for a fixed point.
pub const MAX_REFLOW_PASSES: usize = 16;

/// Whether `rect` lies inside the grid and overlaps no component other than
/// `excluding`.
pub fn is_available(arrangement: &[Component], rect: GridRect, excluding: Option<&ComponentId>) -> bool {
    if rect.right() > GRID_COLUMNS {
        return false;
    }
    arrangement
        .iter()
        .filter(|c| Some(&c.id) != excluding)
        .all(|c| !c.rect.overlaps(&rect))
}

/// Place `component` at the first free cell.
///
/// The width is first raised to the breakpoint minimum (this mutation
/// sticks even if no slot is found). The component itself is never treated
/// as an obstacle, so it may be present in `arrangement`.
pub fn find_slot(
    arrangement: &[Component],
    component: &mut Component,
    bp: Breakpoint,
    max_rows: u16,
) -> bool {
    let min = min_columns(component.kind, bp);
    component.rect.width = component.rect.width.max(min).min(GRID_COLUMNS);
    let probe = component.rect;

    for row in 0..max_rows {
        for col in 0..=(GRID_COLUMNS - probe.width) {
            let candidate = probe.at(col, row);
            if is_available(arrangement, candidate, Some(&component.id)) {
                trace!(
                    target: "dashgrid::solver",
                    id = %component.id,
                    col,
                    row,
                    "slot found"
                );
                component.rect = candidate;
                return true;
            }
        }
    }

    warn!(
        target: "dashgrid::solver",
        id = %component.id,
        width = probe.width,
        height = probe.height,
        max_rows,
        "no free slot; keeping previous position"
    );
    false
}

/// Re-pack the arrangement with first-fit until it is stable.
///
/// Returns the arrangement in `(row, col)` order.
#[must_use]
pub fn reflow(arrangement: &[Component], bp: Breakpoint, max_rows: u16) -> Vec<Component> {
    let mut current = reflow_pass(arrangement, bp, max_rows);
    for pass in 1..MAX_REFLOW_PASSES {
        let next = reflow_pass(&current, bp, max_rows);
        if next == current {
            trace!(target: "dashgrid::solver", passes = pass, "reflow settled");
            return current;
        }
        current = next;
    }
    warn!(
        target: "dashgrid::solver",
        passes = MAX_REFLOW_PASSES,
        components = current.len(),
        "reflow did not settle"
    );
    current
}

/// One pass: stable sort by `(row, col)` then first-fit each component
/// against the already-placed prefix.
#[must_use]
pub fn reflow_pass(arrangement: &[Component], bp: Breakpoint, max_rows: u16) -> Vec<Component> {
    let mut sorted = arrangement.to_vec();
    sorted.sort_by_key(|c| (c.rect.row, c.rect.col));

    let mut placed: Vec<Component> = Vec::with_capacity(sorted.len());
    for mut component in sorted {
        find_slot(&placed, &mut component, bp, max_rows);
        placed.push(component);
    }
    placed
}

/// Whether the component `id` overlaps any other component.
pub fn has_collisions(arrangement: &[Component], id: &ComponentId) -> bool {
    let Some(target) = arrangement.iter().find(|c| &c.id == id) else {
        return false;
    };
    arrangement
        .iter()
        .any(|c| c.id != *id && c.rect.overlaps(&target.rect))
}

/// Ids of every component overlapping `id`, in collection order.
pub fn overlapping(arrangement: &[Component], id: &ComponentId) -> Vec<ComponentId> {
    let Some(target) = arrangement.iter().find(|c| &c.id == id) else {
        return Vec::new();
    };
    arrangement
        .iter()
        .filter(|c| c.id != *id && c.rect.overlaps(&target.rect))
        .map(|c| c.id.clone())
        .collect()
}

/// Every overlapping pair `(earlier, later)` in collection order.
pub fn find_collisions(arrangement: &[Component]) -> Vec<(ComponentId, ComponentId)> {
    let mut pairs = Vec::new();
    for (i, a) in arrangement.iter().enumerate() {
        for b in &arrangement[i + 1..] {
            if a.rect.overlaps(&b.rect) {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn chart(id: &str, col: u16, row: u16) -> Component {
        Component::new(id, ComponentKind::Primary).with_rect(GridRect::new(col, row, 6, 6))
    }

    fn kpi(id: &str, rect: GridRect) -> Component {
        Component::new(id, ComponentKind::Secondary).with_rect(rect)
    }

    #[test]
    fn availability_respects_bounds_and_exclusion() {
        let arrangement = vec![chart("1", 0, 0)];
        assert!(!is_available(&arrangement, GridRect::new(7, 0, 6, 1), None));
        assert!(!is_available(&arrangement, GridRect::new(3, 3, 2, 2), None));
        assert!(is_available(&arrangement, GridRect::new(3, 3, 2, 2), Some(&"1".into())));
        assert!(is_available(&arrangement, GridRect::new(6, 0, 6, 6), None));
    }

    #[test]
    fn first_fit_is_row_major() {
        let mut placed: Vec<Component> = Vec::new();
        let mut expected = vec![(0, 0), (6, 0), (0, 6)].into_iter();
        for id in ["1", "2", "3"] {
            let mut c = Component::new(id, ComponentKind::Primary);
            assert!(find_slot(&placed, &mut c, Breakpoint::Wide, MAX_SCAN_ROWS));
            assert_eq!(Some((c.rect.col, c.rect.row)), expected.next());
            placed.push(c);
        }
    }

    #[test]
    fn find_slot_raises_width_to_minimum() {
        let mut c = kpi("1", GridRect::new(0, 0, 2, 3));
        assert!(find_slot(&[], &mut c, Breakpoint::Narrow, MAX_SCAN_ROWS));
        assert_eq!(c.rect.width, 6);
    }

    #[test]
    fn find_slot_failure_keeps_origin() {
        let wall = kpi("w", GridRect::new(0, 0, 12, 2));
        let mut c = kpi("1", GridRect::new(3, 4, 2, 1));
        assert!(!find_slot(&[wall], &mut c, Breakpoint::Wide, 2));
        assert_eq!((c.rect.col, c.rect.row), (3, 4));
    }

    #[test]
    fn find_slot_ignores_self() {
        let mut c = kpi("1", GridRect::new(4, 0, 2, 3));
        let arrangement = vec![c.clone()];
        assert!(find_slot(&arrangement, &mut c, Breakpoint::Wide, MAX_SCAN_ROWS));
        assert_eq!((c.rect.col, c.rect.row), (0, 0));
    }

    #[test]
    fn reflow_packs_up_and_left() {
        let arrangement = vec![
            kpi("b", GridRect::new(8, 5, 2, 3)),
            kpi("a", GridRect::new(4, 5, 2, 3)),
            chart("c", 0, 20),
        ];
        let out = reflow(&arrangement, Breakpoint::Wide, MAX_SCAN_ROWS);
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(out[0].rect, GridRect::new(0, 0, 2, 3));
        assert_eq!(out[1].rect, GridRect::new(2, 0, 2, 3));
        assert_eq!(out[2].rect, GridRect::new(4, 0, 6, 6));
        assert!(find_collisions(&out).is_empty());
    }

    #[test]
    fn reflow_is_idempotent() {
        let arrangement = vec![chart("1", 3, 2), chart("2", 0, 0), kpi("3", GridRect::new(5, 1, 4, 2))];
        let once = reflow(&arrangement, Breakpoint::Wide, MAX_SCAN_ROWS);
        let twice = reflow(&once, Breakpoint::Wide, MAX_SCAN_ROWS);
        assert_eq!(once, twice);
    }

    #[test]
    fn reflow_settles_when_one_pass_would_not() {
        // One pass leaves "1" (placed late) ahead of "0" in (row, col) order.
        let arrangement = vec![
            kpi("0", GridRect::new(1, 7, 11, 6)),
            kpi("1", GridRect::new(7, 15, 1, 4)),
            kpi("2", GridRect::new(2, 2, 10, 3)),
        ];
        let single = reflow_pass(&arrangement, Breakpoint::Wide, MAX_SCAN_ROWS);
        assert_ne!(reflow_pass(&single, Breakpoint::Wide, MAX_SCAN_ROWS), single);

        let settled = reflow(&arrangement, Breakpoint::Wide, MAX_SCAN_ROWS);
        assert_eq!(reflow(&settled, Breakpoint::Wide, MAX_SCAN_ROWS), settled);
        assert!(find_collisions(&settled).is_empty());

        let rect = |a: &[Component], id: &str| a.iter().find(|c| c.id.as_str() == id).map(|c| c.rect);
        assert_eq!(rect(&single, "1"), Some(GridRect::new(11, 0, 1, 4)));
        assert_eq!(rect(&single, "0"), Some(GridRect::new(0, 3, 11, 6)));
        assert_eq!(rect(&settled, "2"), Some(GridRect::new(0, 0, 10, 3)));
        assert_eq!(rect(&settled, "1"), Some(GridRect::new(10, 0, 1, 4)));
        assert_eq!(rect(&settled, "0"), Some(GridRect::new(0, 4, 11, 6)));
    }

    #[test]
    fn collision_helpers() {
        let arrangement = vec![
            chart("1", 0, 0),
            kpi("2", GridRect::new(5, 5, 2, 2)),
            kpi("3", GridRect::new(6, 0, 2, 2)),
        ];
        assert!(has_collisions(&arrangement, &"1".into()));
        assert!(!has_collisions(&arrangement, &"3".into()));
        assert!(!has_collisions(&arrangement, &"missing".into()));
        assert_eq!(overlapping(&arrangement, &"2".into()), vec![ComponentId::from("1")]);
        assert_eq!(
            find_collisions(&arrangement),
            vec![(ComponentId::from("1"), ComponentId::from("2"))]
        );
    }
}
