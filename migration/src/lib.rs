//! Schema of the client registry.

pub use sea_orm_migration::prelude::*;

mod m20241001_000001_create_users;
mod m20241001_000002_create_subscription_types;
mod m20241001_000003_create_clients;
mod m20241001_000004_create_subscriptions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20241001_000001_create_users::Migration),
      Box::new(m20241001_000002_create_subscription_types::Migration),
      Box::new(m20241001_000003_create_clients::Migration),
      Box::new(m20241001_000004_create_subscriptions::Migration),
    ]
  }
}
