//! Integration tests for frame-driven smoothing.

use dashgrid_core::animation::*;
use dashgrid_core::geometry::GridRect;

#[test]
fn default_damping_converges_within_a_second_of_frames() {
    let mut rect = SmoothedRect::new(GridRect::new(0, 0, 6, 6));
    rect.set_target(GridRect::new(6, 10, 6, 6));
    let mut ticker = Ticker::new();
    ticker.start();
    while ticker.is_running() && rect.step() {
        ticker.advance();
        assert!(ticker.frames() <= 60, "60 frames must settle a 10-cell jump");
    }
    assert!(rect.is_settled());
}

#[test]
fn smoothing_is_monotonic_per_field() {
    let mut rect = SmoothedRect::new(GridRect::new(10, 0, 2, 3)).with_damping(DEFAULT_DAMPING);
    rect.set_target(GridRect::new(0, 8, 2, 3));
    let mut prev = rect.current();
    for _ in 0..100 {
        rect.step();
        let cur = rect.current();
        assert!(cur.col <= prev.col, "col moves toward 0");
        assert!(cur.row >= prev.row, "row moves toward 8");
        assert!(cur.col >= 0.0 && cur.row <= 8.0, "never overshoots");
        prev = cur;
    }
}

#[test]
fn stopped_ticker_freezes_frame_count() {
    let mut ticker = Ticker::new();
    ticker.start();
    ticker.advance();
    ticker.stop();
    ticker.advance();
    assert_eq!(ticker.frames(), 1);
}
