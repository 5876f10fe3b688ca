//! Error types for the client registry

use crate::{
  entity::Role,
  validate::{BirthDateError, MissingField, PhoneFormatError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  MissingField(#[from] MissingField),

  #[error(transparent)]
  BirthDate(#[from] BirthDateError),

  #[error(transparent)]
  Phone(#[from] PhoneFormatError),

  #[error("Client #{0} not found, it may have been deleted elsewhere")]
  ClientNotFound(i32),

  #[error("Could not save changes: {0}")]
  Persistence(#[from] sea_orm::DbErr),

  #[error("Fill in login and password")]
  EmptyCredentials,

  #[error("Invalid login or password")]
  InvalidCredentials,

  #[error("Sign-in is not allowed for the {0} role")]
  AccessDenied(Role),

  #[error("Password hashing failed: {0}")]
  Hash(#[from] bcrypt::BcryptError),
}

impl Error {
  /// Whether the user can fix the input and submit the same form again.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Error::MissingField(_) | Error::BirthDate(_) | Error::Phone(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
