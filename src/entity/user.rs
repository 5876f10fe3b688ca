//! Staff accounts allowed to sign in to the registry.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
  #[sea_orm(string_value = "administrator")]
  Administrator,
  #[sea_orm(string_value = "manager")]
  Manager,
  #[sea_orm(string_value = "trainer")]
  Trainer,
}

impl Role {
  pub fn can_sign_in(self) -> bool {
    !matches!(self, Role::Trainer)
  }

  /// Add, edit and delete affordances.
  pub fn can_manage_clients(self) -> bool {
    matches!(self, Role::Administrator)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Role::Administrator => "administrator",
      Role::Manager => "manager",
      Role::Trainer => "trainer",
    })
  }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub user_id: i32,
  #[sea_orm(unique)]
  pub login: String,
  /// bcrypt hash, never the password itself
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role: Role,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_administrators_manage_clients() {
    assert!(Role::Administrator.can_sign_in());
    assert!(Role::Administrator.can_manage_clients());

    assert!(Role::Manager.can_sign_in());
    assert!(!Role::Manager.can_manage_clients());

    assert!(!Role::Trainer.can_sign_in());
    assert!(!Role::Trainer.can_manage_clients());
  }
}
