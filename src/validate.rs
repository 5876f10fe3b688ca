//! Field rules for a client edit.
//!
//! Everything here is pure: "today" is always passed in and no function
//! touches storage. Each failure is its own small error type with a message
//! that can be shown to the person at the front desk as is.

use std::fmt;

use chrono::{Months, NaiveDate as Date};

/// Youngest age, in full years, at which a client may be registered.
pub const MIN_AGE: u32 = 14;
/// Oldest accepted age, in full years.
pub const MAX_AGE: u32 = 100;

const PHONE_PREFIX: &str = "+79";
const PHONE_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  LastName,
  FirstName,
  Phone,
  BirthDate,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Field::LastName => "last name",
      Field::FirstName => "first name",
      Field::Phone => "phone",
      Field::BirthDate => "birth date",
    }
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

fn labels(fields: &[Field]) -> String {
  fields.iter().map(|field| field.label()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Fill in the required fields: {}", labels(.fields))]
pub struct MissingField {
  /// In form order.
  pub fields: Vec<Field>,
}

impl MissingField {
  pub fn new(fields: Vec<Field>) -> Self {
    Self { fields }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BirthDateError {
  #[error("Birth date cannot be in the future")]
  FutureDate,
  #[error("Client must be at least {} years old", MIN_AGE)]
  TooYoung,
  #[error("Birth date cannot be more than {} years ago", MAX_AGE)]
  TooOld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Phone number must look like +79XXXXXXXXX, e.g. +79123456789")]
pub struct PhoneFormatError;

/// A phone number reduced to `+7` and ten digits, the only form stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CanonicalPhone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<CanonicalPhone> for String {
  fn from(phone: CanonicalPhone) -> Self {
    phone.0
  }
}

pub fn validate_required_fields(
  last_name: &str,
  first_name: &str,
  phone: &str,
) -> Result<(), MissingField> {
  let fields: Vec<_> = [
    (Field::LastName, last_name),
    (Field::FirstName, first_name),
    (Field::Phone, phone),
  ]
  .into_iter()
  .filter(|(_, value)| value.trim().is_empty())
  .map(|(field, _)| field)
  .collect();

  if fields.is_empty() { Ok(()) } else { Err(MissingField::new(fields)) }
}

/// `years` calendar years before `date`; Feb 29 falls back to Feb 28.
fn years_before(date: Date, years: u32) -> Date {
  date.checked_sub_months(Months::new(years * 12)).unwrap_or(Date::MIN)
}

/// Both age bounds are inclusive: a client turning 14 or 100 today passes.
pub fn validate_birth_date(
  birth_date: Date,
  today: Date,
) -> Result<(), BirthDateError> {
  if birth_date > today {
    return Err(BirthDateError::FutureDate);
  }
  if birth_date > years_before(today, MIN_AGE) {
    return Err(BirthDateError::TooYoung);
  }
  if birth_date < years_before(today, MAX_AGE) {
    return Err(BirthDateError::TooOld);
  }
  Ok(())
}

fn dialable(raw: &str) -> String {
  raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

pub fn validate_phone(raw: &str) -> Result<CanonicalPhone, PhoneFormatError> {
  let clean = dialable(raw);

  let valid = clean.len() == PHONE_LEN
    && clean.starts_with(PHONE_PREFIX)
    && clean[1..].bytes().all(|b| b.is_ascii_digit());

  if valid { Ok(CanonicalPhone(clean)) } else { Err(PhoneFormatError) }
}

/// Renders `+7(XXX)XXX-XX-XX` from whatever has been typed so far.
///
/// Input that does not start with `+7` followed by at least one digit is
/// returned untouched; digits past the tenth are dropped.
pub fn format_phone_for_display(raw: &str) -> String {
  let clean = dialable(raw);
  let Some(rest) = clean.strip_prefix("+7") else {
    return raw.to_string();
  };

  let digits: String =
    rest.chars().filter(char::is_ascii_digit).take(10).collect();
  if digits.is_empty() {
    return raw.to_string();
  }

  let len = digits.len();
  let mut out = format!("+7({})", &digits[..len.min(3)]);
  if len > 3 {
    out.push_str(&digits[3..len.min(6)]);
  }
  if len > 6 {
    out.push('-');
    out.push_str(&digits[6..len.min(8)]);
  }
  if len > 8 {
    out.push('-');
    out.push_str(&digits[8..len]);
  }
  out
}

/// State of a phone text box that re-renders itself while the user types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneInput {
  text: String,
  caret: usize,
}

impl PhoneInput {
  pub fn text(&self) -> &str {
    &self.text
  }

  /// Caret position in characters.
  pub fn caret(&self) -> usize {
    self.caret
  }

  /// Keystroke filter: digits, `+` and control characters only.
  pub fn accepts(typed: &str) -> bool {
    typed.chars().all(|c| c.is_ascii_digit() || c == '+' || c.is_control())
  }

  /// Takes the box content after an edit. Returns `true` when the content
  /// was rewritten; the caret is then clamped to the new length.
  pub fn apply(&mut self, typed: &str, caret: usize) -> bool {
    let formatted = format_phone_for_display(typed);
    let rewritten = formatted != typed;

    self.caret = if rewritten {
      caret.min(formatted.chars().count())
    } else {
      caret
    };
    self.text = formatted;
    rewritten
  }
}
