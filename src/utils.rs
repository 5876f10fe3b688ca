use crate::prelude::*;

pub fn format_date(date: Date) -> String {
  date.format("%d.%m.%Y").to_string()
}

/// Full years between `birth_date` and `today`.
pub fn age(birth_date: Date, today: Date) -> u32 {
  today.years_since(birth_date).unwrap_or(0)
}

/// Days left on a plan ending on `end_date`, zero once it is over.
pub fn days_left(end_date: Date, today: Date) -> i64 {
  (end_date - today).num_days().max(0)
}
