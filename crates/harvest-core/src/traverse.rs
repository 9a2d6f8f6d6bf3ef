//! Scroll-driven traversal of a virtualized grid
//!
//! A virtualized grid only mounts the rows and columns currently scrolled
//! into view, so one extraction sees one window of the data. The controller
//! sweeps the scrollable area (vertical passes nested inside horizontal
//! offsets), extracting after every scroll step and folding the partial
//! observations into a [`RowAccumulator`].

use crate::error::{Error, Result};
use crate::merge::RowAccumulator;
use crate::table::{ColumnSpec, FieldId, RowObservation, Table};
use std::time::Duration;

/// Fraction of the viewport advanced per scroll step
const STEP_FRACTION: f64 = 0.6;

/// Minimum horizontal step, in scroll units
const H_STEP_MIN: f64 = 300.0;

/// Minimum vertical step, in scroll units
const V_STEP_MIN: f64 = 150.0;

/// Horizontal extents at or below this are not worth sweeping
const H_SKIP_THRESHOLD: f64 = 10.0;

/// Observed movement at or below this counts as a stalled advance
const CONVERGENCE_EPSILON: f64 = 2.0;

/// Consecutive stalled advances before a vertical sweep stops
const CONVERGENCE_STREAK: u32 = 3;

/// Scrollable extents and viewport dimensions reported by the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollExtents {
    pub max_top: f64,
    pub max_left: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

/// The field-locator capability a host adapter provides over one grid
///
/// A traversal borrows the surface exclusively for its whole duration, so
/// two sweeps can never run against the same grid concurrently.
pub trait GridSurface {
    /// Report the grid's columns in display order
    fn list_columns(&self) -> Result<Vec<ColumnSpec>>;

    /// Extract the currently rendered rows
    ///
    /// Observation keys must be stable row identities, not render indices.
    fn extract_visible_rows(&mut self, fields: &[FieldId]) -> Result<Vec<RowObservation>>;

    /// Report scrollable extents and viewport size
    fn scroll_extents(&self) -> Result<ScrollExtents>;

    /// Scroll to the given position (the surface may clamp)
    fn set_scroll(&mut self, top: f64, left: f64) -> Result<()>;

    /// Report the current (top, left) scroll position
    fn current_scroll(&self) -> Result<(f64, f64)>;

    /// Pause long enough for the grid to re-render after a scroll
    fn settle(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Tuning for one traversal
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Pause after every scroll change
    pub settle_delay: Duration,
    /// Hard cap on extraction steps per vertical sweep, in case the
    /// convergence heuristic never triggers
    pub max_vertical_steps: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(150),
            max_vertical_steps: 400,
        }
    }
}

/// Counters reported alongside a traversal's table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Extraction passes performed
    pub passes: usize,
    /// Row observations fed to the merger (before dedup)
    pub observations: usize,
}

/// Sweep the whole grid and merge every pass into one table
///
/// Restores the original scroll position before returning. Fails with
/// [`Error::StructureNotFound`] (propagated from the surface) when the grid
/// lacks the expected structure; callers then fall back to [`single_pass`].
pub fn traverse<S: GridSurface>(
    surface: &mut S,
    config: &TraversalConfig,
) -> Result<(Table, SweepStats)> {
    let columns = surface.list_columns()?;
    if columns.is_empty() {
        return Err(Error::StructureNotFound(
            "grid reports no columns".to_string(),
        ));
    }
    let fields: Vec<FieldId> = columns.iter().map(|c| c.field_id.clone()).collect();

    let extents = surface.scroll_extents()?;
    let (origin_top, origin_left) = surface.current_scroll()?;

    let offsets = horizontal_offsets(extents.max_left, extents.viewport_width);
    let v_step = (extents.viewport_height * STEP_FRACTION).max(V_STEP_MIN);

    let mut acc = RowAccumulator::new();
    let mut stats = SweepStats::default();

    for &left in &offsets {
        let (top, _) = surface.current_scroll()?;
        surface.set_scroll(top, left)?;
        surface.settle(config.settle_delay);
        surface.set_scroll(0.0, left)?;
        surface.settle(config.settle_delay);

        let mut target_top = 0.0;
        let mut last_top = 0.0;
        let mut stalled = 0u32;

        for step in 0.. {
            let pass = surface.extract_visible_rows(&fields)?;
            stats.passes += 1;
            stats.observations += pass.len();
            acc.absorb(pass);

            if step + 1 >= config.max_vertical_steps {
                break;
            }

            target_top += v_step;
            surface.set_scroll(target_top, left)?;
            surface.settle(config.settle_delay);

            let (observed_top, _) = surface.current_scroll()?;
            if (observed_top - last_top).abs() <= CONVERGENCE_EPSILON {
                stalled += 1;
                if stalled >= CONVERGENCE_STREAK {
                    break;
                }
            } else {
                stalled = 0;
            }
            last_top = observed_top;
        }
    }

    surface.set_scroll(origin_top, origin_left)?;
    surface.settle(config.settle_delay);

    Ok((acc.into_table(&columns), stats))
}

/// Extract whatever is currently rendered, without scrolling
///
/// The fallback path when a full sweep cannot run.
pub fn single_pass<S: GridSurface>(surface: &mut S) -> Result<Table> {
    let columns = surface.list_columns()?;
    if columns.is_empty() {
        return Err(Error::StructureNotFound(
            "grid reports no columns".to_string(),
        ));
    }
    let fields: Vec<FieldId> = columns.iter().map(|c| c.field_id.clone()).collect();

    let mut acc = RowAccumulator::new();
    acc.absorb(surface.extract_visible_rows(&fields)?);
    Ok(acc.into_table(&columns))
}

/// Ordered horizontal offsets for a sweep
///
/// `0`, then whole steps while short of `max_left`, then `max_left` itself
/// so the right edge is always visited. A grid with no meaningful
/// horizontal virtualization gets the single offset `0`.
fn horizontal_offsets(max_left: f64, viewport_width: f64) -> Vec<f64> {
    if max_left <= H_SKIP_THRESHOLD {
        return vec![0.0];
    }
    let step = (viewport_width * STEP_FRACTION).max(H_STEP_MIN);
    let mut offsets = vec![0.0];
    let mut next = step;
    while next < max_left {
        offsets.push(next);
        next += step;
    }
    offsets.push(max_left);
    offsets
}
