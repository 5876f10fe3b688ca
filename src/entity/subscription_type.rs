//! Catalog of plans a client can buy. Seeded by migrations, never edited here.

use chrono::TimeDelta;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_types")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub subscription_type_id: i32,
  pub name: String,
  pub duration_days: i32,
}

impl Model {
  /// Last day of a plan bought on `start`.
  pub fn ends_on(&self, start: Date) -> Date {
    start + TimeDelta::days(i64::from(self.duration_days))
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
