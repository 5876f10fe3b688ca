//! Save flow of the client form.
//!
//! One call validates the form, writes the client and starts or renews its
//! subscription inside a single transaction. `Ok(client)` means the record is
//! saved; any `Err` means nothing was written.

use crate::{
  entity::{client, subscription, subscription_type},
  prelude::*,
  sv::{self, ClientPatch},
  validate::{
    Field, MissingField, validate_birth_date, validate_phone,
    validate_required_fields,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Create,
  /// Edit the client with this id.
  Edit(i32),
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDraft {
  pub last_name: String,
  pub first_name: String,
  pub middle_name: String,
  pub birth_date: Option<Date>,
  pub phone: String,
}

impl ClientDraft {
  /// Form pre-filled from a stored client.
  pub fn from_client(client: &client::Model) -> Self {
    Self {
      last_name: client.last_name.clone(),
      first_name: client.first_name.clone(),
      middle_name: client.middle_name.clone().unwrap_or_default(),
      birth_date: Some(client.birth_date),
      phone: client.phone.clone(),
    }
  }

  /// Checks run in a fixed order and stop at the first failure.
  pub fn validate(&self, today: Date) -> Result<ClientPatch> {
    validate_required_fields(&self.last_name, &self.first_name, &self.phone)?;

    let birth_date = self
      .birth_date
      .ok_or_else(|| MissingField::new(vec![Field::BirthDate]))?;
    validate_birth_date(birth_date, today)?;

    let phone = validate_phone(&self.phone)?;

    let middle_name = self.middle_name.trim();
    Ok(ClientPatch {
      last_name: self.last_name.trim().to_string(),
      first_name: self.first_name.trim().to_string(),
      middle_name: (!middle_name.is_empty()).then(|| middle_name.to_string()),
      birth_date,
      phone: phone.into(),
    })
  }
}

pub struct Editor<'a> {
  db: &'a DatabaseConnection,
  today: Date,
}

impl<'a> Editor<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db, today: Local::now().date_naive() }
  }

  /// Pins the date used for age checks, registration and subscriptions.
  pub fn on(mut self, today: Date) -> Self {
    self.today = today;
    self
  }

  pub fn today(&self) -> Date {
    self.today
  }

  /// Client and its active subscription, for pre-filling the edit form.
  pub async fn load(
    &self,
    client_id: i32,
  ) -> Result<(client::Model, Option<subscription::Model>)> {
    let client = sv::Client::new(self.db)
      .by_id(client_id)
      .await?
      .ok_or(Error::ClientNotFound(client_id))?;
    let active = sv::Subscription::new(self.db).active(client_id).await?;
    Ok((client, active))
  }

  pub async fn save(
    &self,
    mode: Mode,
    draft: &ClientDraft,
    kind: Option<&subscription_type::Model>,
  ) -> Result<client::Model> {
    let patch = draft.validate(self.today)?;

    let txn = self.db.begin().await?;
    let clients = sv::Client::new(&txn);

    let client = match mode {
      Mode::Create => clients.create(patch, self.today).await?,
      Mode::Edit(client_id) => clients.update(client_id, patch).await?,
    };

    if let Some(kind) = kind {
      sv::Subscription::new(&txn)
        .upsert_active(client.client_id, kind, self.today)
        .await?;
    }

    txn.commit().await?;

    match mode {
      Mode::Create => info!("Added client #{}", client.client_id),
      Mode::Edit(_) => info!("Updated client #{}", client.client_id),
    }
    Ok(client)
  }

  pub async fn delete(&self, client_id: i32) -> Result<()> {
    sv::Client::new(self.db).delete(client_id).await
  }
}
