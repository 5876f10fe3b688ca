use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Clients::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Clients::ClientId)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Clients::LastName).string().not_null())
          .col(ColumnDef::new(Clients::FirstName).string().not_null())
          .col(ColumnDef::new(Clients::MiddleName).string().null())
          .col(ColumnDef::new(Clients::BirthDate).date().not_null())
          .col(ColumnDef::new(Clients::Phone).string().not_null())
          .col(ColumnDef::new(Clients::RegistrationDate).date().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_clients_last_name")
          .table(Clients::Table)
          .col(Clients::LastName)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Clients::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Clients {
  Table,
  ClientId,
  LastName,
  FirstName,
  MiddleName,
  BirthDate,
  Phone,
  RegistrationDate,
}
