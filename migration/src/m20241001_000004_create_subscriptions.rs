use sea_orm_migration::prelude::*;

use super::m20241001_000002_create_subscription_types::SubscriptionTypes;
use super::m20241001_000003_create_clients::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Subscriptions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Subscriptions::SubscriptionId)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Subscriptions::ClientId).integer().not_null())
          .col(
            ColumnDef::new(Subscriptions::SubscriptionTypeId)
              .integer()
              .not_null(),
          )
          .col(ColumnDef::new(Subscriptions::StartDate).date().not_null())
          .col(ColumnDef::new(Subscriptions::EndDate).date().not_null())
          .col(
            ColumnDef::new(Subscriptions::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_subscriptions_client")
              .from(Subscriptions::Table, Subscriptions::ClientId)
              .to(Clients::Table, Clients::ClientId)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_subscriptions_type")
              .from(Subscriptions::Table, Subscriptions::SubscriptionTypeId)
              .to(SubscriptionTypes::Table, SubscriptionTypes::SubscriptionTypeId)
              .on_delete(ForeignKeyAction::Restrict),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_subscriptions_client_status")
          .table(Subscriptions::Table)
          .col(Subscriptions::ClientId)
          .col(Subscriptions::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Subscriptions {
  Table,
  SubscriptionId,
  ClientId,
  SubscriptionTypeId,
  StartDate,
  EndDate,
  Status,
}
