use crate::{
  entity::{Role, user},
  prelude::*,
};

/// Who is signed in. Only the front-end consults the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub user_id: i32,
  pub login: String,
  pub role: Role,
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
  cost: u32,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db, cost: bcrypt::DEFAULT_COST }
  }

  /// bcrypt work factor for newly stored passwords.
  pub fn with_cost(mut self, cost: u32) -> Self {
    self.cost = cost;
    self
  }

  pub async fn by_login(&self, login: &str) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::Login.eq(login))
      .one(self.db)
      .await?;
    Ok(user)
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(user::Entity::find().count(self.db).await?)
  }

  pub async fn create(
    &self,
    login: &str,
    password: &str,
    role: Role,
  ) -> Result<user::Model> {
    let login = login.trim();
    if login.is_empty() || password.is_empty() {
      return Err(Error::EmptyCredentials);
    }

    let user = user::ActiveModel {
      user_id: NotSet,
      login: Set(login.to_string()),
      password_hash: Set(bcrypt::hash(password, self.cost)?),
      role: Set(role),
      created_at: Set(Utc::now().naive_utc()),
    };

    Ok(user.insert(self.db).await?)
  }

  /// Creates the administrator account unless the login is already taken.
  /// Returns whether an account was created.
  pub async fn ensure_admin(&self, login: &str, password: &str) -> Result<bool> {
    if self.by_login(login.trim()).await?.is_some() {
      return Ok(false);
    }

    self.create(login, password, Role::Administrator).await?;
    info!("Created administrator account `{}`", login.trim());
    Ok(true)
  }

  pub async fn authenticate(
    &self,
    login: &str,
    password: &str,
  ) -> Result<Session> {
    let login = login.trim();
    if login.is_empty() || password.is_empty() {
      return Err(Error::EmptyCredentials);
    }

    let Some(user) = self.by_login(login).await? else {
      warn!("Sign-in attempt for unknown login `{}`", login);
      return Err(Error::InvalidCredentials);
    };

    if !bcrypt::verify(password, &user.password_hash)? {
      warn!("Wrong password for `{}`", login);
      return Err(Error::InvalidCredentials);
    }

    if !user.role.can_sign_in() {
      return Err(Error::AccessDenied(user.role));
    }

    info!("User `{}` signed in as {}", user.login, user.role);
    Ok(Session { user_id: user.user_id, login: user.login, role: user.role })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::setup_test_db;

  #[tokio::test]
  async fn test_password_is_hashed() {
    let db = setup_test_db().await;

    let user = User::new(&db)
      .with_cost(4)
      .create("admin", "s3cret", Role::Administrator)
      .await
      .unwrap();

    assert_ne!(user.password_hash, "s3cret");
    assert!(bcrypt::verify("s3cret", &user.password_hash).unwrap());
  }

  #[tokio::test]
  async fn test_authenticate() {
    let db = setup_test_db().await;
    let sv = User::new(&db).with_cost(4);
    sv.create("manager", "pass", Role::Manager).await.unwrap();

    let session = sv.authenticate(" manager ", "pass").await.unwrap();
    assert_eq!(session.login, "manager");
    assert_eq!(session.role, Role::Manager);

    assert!(matches!(
      sv.authenticate("manager", "wrong").await,
      Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
      sv.authenticate("nobody", "pass").await,
      Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
      sv.authenticate("manager", "").await,
      Err(Error::EmptyCredentials)
    ));
  }

  #[tokio::test]
  async fn test_trainer_cannot_sign_in() {
    let db = setup_test_db().await;
    let sv = User::new(&db).with_cost(4);
    sv.create("coach", "pass", Role::Trainer).await.unwrap();

    assert!(matches!(
      sv.authenticate("coach", "pass").await,
      Err(Error::AccessDenied(Role::Trainer))
    ));
  }

  #[tokio::test]
  async fn test_ensure_admin_once() {
    let db = setup_test_db().await;
    let sv = User::new(&db).with_cost(4);

    assert!(sv.ensure_admin("root", "pass").await.unwrap());
    assert!(!sv.ensure_admin("root", "other").await.unwrap());

    let session = sv.authenticate("root", "pass").await.unwrap();
    assert!(session.role.can_manage_clients());
  }
}
