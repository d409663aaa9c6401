//! Month and quarter tables for the single-year planning axis.
//!
//! Months are zero-indexed everywhere (0 = January); only labels shown to
//! people use names or one-based numbers.

/// Number of month columns on the axis.
pub const MONTHS_PER_YEAR: u8 = 12;

/// Index of the last month (December).
pub const LAST_MONTH: u8 = MONTHS_PER_YEAR - 1;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Full month name, or `None` outside 0-11.
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTHS.get(month as usize).copied()
}

/// Three-letter month name, or `None` outside 0-11.
pub fn month_short(month: u8) -> Option<&'static str> {
    MONTHS_SHORT.get(month as usize).copied()
}
