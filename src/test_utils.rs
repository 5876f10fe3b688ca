use migration::{Migrator, MigratorTrait};

use crate::{entity::subscription_type, prelude::*, sv};

/// Fresh in-memory database with the full schema and seeded plans.
///
/// A single pooled connection: every connection to `sqlite::memory:` opens
/// its own empty database.
pub async fn setup_test_db() -> DatabaseConnection {
  let mut options = ConnectOptions::new("sqlite::memory:");
  options.max_connections(1).min_connections(1).sqlx_logging(false);

  let db = Database::connect(options).await.unwrap();
  Migrator::up(&db, None).await.unwrap();
  db
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
  Date::from_ymd_opt(y, m, d).unwrap()
}

/// Valid patch: born 2000-01-01, phone +79991234567.
pub fn patch(last_name: &str, first_name: &str) -> sv::ClientPatch {
  sv::ClientPatch {
    last_name: last_name.to_string(),
    first_name: first_name.to_string(),
    middle_name: None,
    birth_date: date(2000, 1, 1),
    phone: "+79991234567".to_string(),
  }
}

/// Seeded plan with the given duration.
pub async fn plan(db: &DatabaseConnection, days: i32) -> subscription_type::Model {
  sv::SubscriptionType::new(db)
    .all()
    .await
    .unwrap()
    .into_iter()
    .find(|kind| kind.duration_days == days)
    .unwrap()
}
