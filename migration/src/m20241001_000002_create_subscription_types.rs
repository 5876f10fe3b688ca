use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Plans offered at the front desk: (name, duration in days).
const PLANS: [(&str, i32); 4] = [
  ("Месяц", 30),
  ("3 месяца", 92),
  ("Полгода", 183),
  ("Год", 365),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SubscriptionTypes::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SubscriptionTypes::SubscriptionTypeId)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(SubscriptionTypes::Name)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(SubscriptionTypes::DurationDays)
              .integer()
              .not_null()
              .check(Expr::col(SubscriptionTypes::DurationDays).gt(0)),
          )
          .to_owned(),
      )
      .await?;

    let mut seed = Query::insert();
    seed
      .into_table(SubscriptionTypes::Table)
      .columns([SubscriptionTypes::Name, SubscriptionTypes::DurationDays]);
    for (name, days) in PLANS {
      seed.values_panic([name.into(), days.into()]);
    }

    manager.exec_stmt(seed).await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SubscriptionTypes::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SubscriptionTypes {
  Table,
  SubscriptionTypeId,
  Name,
  DurationDays,
}
