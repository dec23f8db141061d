use chrono::Datelike;

/// Time with an employer reported as years plus months, in months.
/// `None` if the total does not fit in a `u32`.
pub fn total_months(years: u32, months: u32) -> Option<u32> {
    years.checked_mul(12)?.checked_add(months)
}

/// Whole calendar months from `older` to `recent`. Day-of-month is ignored,
/// so 28 Jan → 5 Mar counts as two months.
pub fn elapsed_months(recent: &impl Datelike, older: &impl Datelike) -> i32 {
    (recent.year() - older.year()) * 12 + recent.month() as i32 - older.month() as i32
}
