use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub client_id: i32,
  pub last_name: String,
  pub first_name: String,
  pub middle_name: Option<String>,
  pub birth_date: Date,
  /// Canonical `+79XXXXXXXXX` form.
  pub phone: String,
  pub registration_date: Date,
}

impl Model {
  /// "Last First Middle", skipping an absent middle name.
  pub fn full_name(&self) -> String {
    match &self.middle_name {
      Some(middle) => {
        format!("{} {} {}", self.last_name, self.first_name, middle)
      }
      None => format!("{} {}", self.last_name, self.first_name),
    }
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::subscription::Entity")]
  Subscriptions,
}

impl Related<super::subscription::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Subscriptions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
