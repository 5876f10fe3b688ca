use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{client, subscription_type};

#[derive(
  Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SubscriptionStatus {
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "expired")]
  Expired,
  #[sea_orm(string_value = "cancelled")]
  Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub subscription_id: i32,
  pub client_id: i32,
  pub subscription_type_id: i32,
  pub start_date: Date,
  pub end_date: Date,
  pub status: SubscriptionStatus,
}

impl Model {
  pub fn is_active(&self) -> bool {
    self.status == SubscriptionStatus::Active
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "client::Entity",
    from = "Column::ClientId",
    to = "client::Column::ClientId",
    on_delete = "Cascade"
  )]
  Client,
  #[sea_orm(
    belongs_to = "subscription_type::Entity",
    from = "Column::SubscriptionTypeId",
    to = "subscription_type::Column::SubscriptionTypeId"
  )]
  SubscriptionType,
}

impl Related<client::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Client.def()
  }
}

impl Related<subscription_type::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::SubscriptionType.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
