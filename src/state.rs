use migration::{Migrator, MigratorTrait};

use crate::{config::Config, prelude::*, sv, workflow::Editor};

pub struct Services<'a> {
  pub client: sv::Client<'a, DatabaseConnection>,
  pub subscription: sv::Subscription<'a, DatabaseConnection>,
  pub subscription_type: sv::SubscriptionType<'a, DatabaseConnection>,
  pub user: sv::User<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str()).await?;

    info!("Running migrations...");
    Migrator::up(&db, None).await?;

    Ok(Self { db, config })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      client: sv::Client::new(&self.db),
      subscription: sv::Subscription::new(&self.db),
      subscription_type: sv::SubscriptionType::new(&self.db),
      user: sv::User::new(&self.db).with_cost(self.config.hash_cost),
    }
  }

  /// Save flow dated today.
  pub fn editor(&self) -> Editor<'_> {
    Editor::new(&self.db)
  }

  /// Creates the configured administrator on first start.
  pub async fn bootstrap(&self) -> Result<()> {
    let Some(admin) = &self.config.admin else {
      let users = sv::User::new(&self.db).count().await?;
      if users == 0 {
        warn!(
          "No user accounts and no ADMIN_LOGIN configured, nobody can sign in"
        );
      }
      return Ok(());
    };

    self.sv().user.ensure_admin(&admin.login, &admin.password).await?;
    Ok(())
  }
}
