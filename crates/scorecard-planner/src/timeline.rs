//! Time axis: pixel offsets to month indices and back.
//!
//! Offsets passed to the free functions are relative to the start of the
//! timeline area. [`TimeAxis`] converts grid coordinates, which include the
//! label column, into those offsets.

use scorecard_models::{LAST_MONTH, MONTHS_PER_YEAR};

pub const DEFAULT_CELL_WIDTH: f64 = 80.0;
pub const DEFAULT_LABEL_WIDTH: f64 = 250.0;
pub const DEFAULT_HANDLE_WIDTH: f64 = 12.0;

/// Month under `offset`: `floor(offset / cell_width)` clamped to 0-11.
///
/// Negative offsets, NaN and non-positive cell widths map to month 0.
pub fn month_index_from_offset(offset: f64, cell_width: f64) -> u8 {
    if !(offset > 0.0) || !(cell_width > 0.0) {
        return 0;
    }
    clamp_month((offset / cell_width).floor() as i64)
}

/// Clamps any month arithmetic result into 0-11.
pub fn clamp_month(month: i64) -> u8 {
    month.clamp(0, LAST_MONTH as i64) as u8
}

/// Quarter (0-3) containing `month`.
pub fn quarter_of(month: u8) -> u8 {
    month.min(LAST_MONTH) / 3
}

/// Whole months covered by a horizontal pointer movement.
///
/// Rounds half away from negative infinity, so a drag of exactly half a cell
/// to the right counts as one month and half a cell to the left as zero.
pub fn month_delta(delta_px: f64, cell_width: f64) -> i64 {
    if !(cell_width > 0.0) || !delta_px.is_finite() {
        return 0;
    }
    (delta_px / cell_width + 0.5).floor() as i64
}

/// Left edge of `month` relative to the timeline start.
pub fn month_start_offset(month: u8, cell_width: f64) -> f64 {
    f64::from(month.min(LAST_MONTH)) * cell_width
}

/// Timeline geometry for one grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    pub cell_width: f64,
    pub label_width: f64,
}

impl TimeAxis {
    pub fn new(cell_width: f64, label_width: f64) -> Self {
        Self {
            cell_width,
            label_width,
        }
    }

    /// Converts a grid x coordinate into a timeline offset, flooring at 0.
    pub fn timeline_offset(&self, grid_x: f64) -> f64 {
        (grid_x - self.label_width).max(0.0)
    }

    /// Month under a grid x coordinate.
    pub fn month_at(&self, grid_x: f64) -> u8 {
        month_index_from_offset(self.timeline_offset(grid_x), self.cell_width)
    }

    /// Horizontal extent `[left, right)` of a bar spanning the given months,
    /// in timeline offsets.
    pub fn bar_extent(&self, start_month: u8, end_month: u8) -> (f64, f64) {
        let left = month_start_offset(start_month, self.cell_width);
        let right = month_start_offset(end_month, self.cell_width) + self.cell_width;
        (left, right)
    }

    /// Width of the twelve month columns.
    pub fn timeline_width(&self) -> f64 {
        f64::from(MONTHS_PER_YEAR) * self.cell_width
    }

    /// Width of the whole grid including the label column.
    pub fn grid_width(&self) -> f64 {
        self.label_width + self.timeline_width()
    }
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH, DEFAULT_LABEL_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_index_floors_and_clamps() {
        assert_eq!(month_index_from_offset(0.0, 80.0), 0);
        assert_eq!(month_index_from_offset(79.9, 80.0), 0);
        assert_eq!(month_index_from_offset(80.0, 80.0), 1);
        assert_eq!(month_index_from_offset(250.0, 80.0), 3);
        assert_eq!(month_index_from_offset(959.0, 80.0), 11);
        assert_eq!(month_index_from_offset(5000.0, 80.0), 11);
        assert_eq!(month_index_from_offset(-40.0, 80.0), 0);
        assert_eq!(month_index_from_offset(f64::NAN, 80.0), 0);
        assert_eq!(month_index_from_offset(100.0, 0.0), 0);
    }

    #[test]
    fn test_month_index_is_bounded_and_monotonic() {
        for width in [1.0, 7.5, 80.0, 123.0] {
            let mut previous = 0;
            for step in 0..4000 {
                let p = step as f64 * 0.75;
                let month = month_index_from_offset(p, width);
                assert!(month <= 11);
                assert!(month >= previous, "not monotonic at p={p} w={width}");
                previous = month;
            }
        }
    }

    #[test]
    fn test_clamp_month() {
        for m in -30..40_i64 {
            let clamped = clamp_month(m);
            assert!(clamped <= 11);
            if (0..=11).contains(&m) {
                assert_eq!(clamped as i64, m);
            }
        }
        assert_eq!(clamp_month(i64::MIN), 0);
        assert_eq!(clamp_month(i64::MAX), 11);
    }

    #[test]
    fn test_quarter_of() {
        let quarters: Vec<u8> = (0..12).map(quarter_of).collect();
        assert_eq!(quarters, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn test_month_delta_rounds_like_the_browser() {
        assert_eq!(month_delta(160.0, 80.0), 2);
        assert_eq!(month_delta(39.0, 80.0), 0);
        assert_eq!(month_delta(40.0, 80.0), 1);
        assert_eq!(month_delta(-40.0, 80.0), 0);
        assert_eq!(month_delta(-41.0, 80.0), -1);
        assert_eq!(month_delta(-400.0, 80.0), -5);
    }

    #[test]
    fn test_axis_offsets() {
        let axis = TimeAxis::default();
        assert_eq!(axis.timeline_offset(100.0), 0.0);
        assert_eq!(axis.timeline_offset(330.0), 80.0);
        assert_eq!(axis.month_at(250.0 + 250.0), 3);
        assert_eq!(axis.bar_extent(2, 5), (160.0, 480.0));
        assert_eq!(axis.grid_width(), 1210.0);
    }
}
