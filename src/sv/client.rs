use serde::Serialize;

use crate::{
  entity::{client, subscription, subscription_type},
  prelude::*,
  sv,
};

const NO_SUBSCRIPTION: &str = "No subscription";

/// Every editable column of a client. Identity and registration date are
/// owned by storage and never part of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPatch {
  pub last_name: String,
  pub first_name: String,
  pub middle_name: Option<String>,
  pub birth_date: Date,
  pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
  #[serde(flatten)]
  pub subscription: subscription::Model,
  /// `None` only if the catalog row is gone.
  pub kind: Option<subscription_type::Model>,
}

/// A client row as listed on the main screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCard {
  #[serde(flatten)]
  pub client: client::Model,
  pub subscriptions: Vec<SubscriptionView>,
}

impl ClientCard {
  pub fn active(&self) -> Option<&SubscriptionView> {
    self.subscriptions.iter().find(|view| view.subscription.is_active())
  }

  /// Plan name of the active subscription, falling back to the first one.
  pub fn subscription_label(&self) -> &str {
    self
      .active()
      .and_then(|view| view.kind.as_ref())
      .or_else(|| self.subscriptions.first().and_then(|view| view.kind.as_ref()))
      .map_or(NO_SUBSCRIPTION, |kind| kind.name.as_str())
  }
}

fn strip_phone_punctuation(text: &str) -> String {
  text.chars().filter(|c| !matches!(c, '+' | '(' | ')' | ' ' | '-')).collect()
}

/// `query` is lowercased; `phone_query` is `query` without phone punctuation.
fn is_match(client: &client::Model, query: &str, phone_query: &str) -> bool {
  let by_name = [
    Some(&client.last_name),
    Some(&client.first_name),
    client.middle_name.as_ref(),
  ]
  .into_iter()
  .flatten()
  .any(|name| name.to_lowercase().contains(query));

  by_name
    || strip_phone_punctuation(&client.phone.to_lowercase())
      .contains(phone_query)
}

pub struct Client<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Client<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, client_id: i32) -> Result<Option<client::Model>> {
    let client = client::Entity::find_by_id(client_id).one(self.db).await?;
    Ok(client)
  }

  pub async fn create(
    &self,
    patch: ClientPatch,
    registered_on: Date,
  ) -> Result<client::Model> {
    let client = client::ActiveModel {
      client_id: NotSet,
      last_name: Set(patch.last_name),
      first_name: Set(patch.first_name),
      middle_name: Set(patch.middle_name),
      birth_date: Set(patch.birth_date),
      phone: Set(patch.phone),
      registration_date: Set(registered_on),
    };

    Ok(client.insert(self.db).await?)
  }

  pub async fn update(
    &self,
    client_id: i32,
    patch: ClientPatch,
  ) -> Result<client::Model> {
    let client = client::Entity::find_by_id(client_id)
      .one(self.db)
      .await?
      .ok_or(Error::ClientNotFound(client_id))?;

    let client = client::ActiveModel {
      last_name: Set(patch.last_name),
      first_name: Set(patch.first_name),
      middle_name: Set(patch.middle_name),
      birth_date: Set(patch.birth_date),
      phone: Set(patch.phone),
      ..client.into()
    }
    .update(self.db)
    .await?;

    Ok(client)
  }

  /// All clients in storage order. With `with_subscriptions` every card
  /// carries the client's subscriptions joined with their plan.
  pub async fn list(&self, with_subscriptions: bool) -> Result<Vec<ClientCard>> {
    let query = client::Entity::find().order_by_asc(client::Column::ClientId);

    if !with_subscriptions {
      let clients = query.all(self.db).await?;
      return Ok(
        clients
          .into_iter()
          .map(|client| ClientCard { client, subscriptions: Vec::new() })
          .collect(),
      );
    }

    let rows = query
      .find_with_related(subscription::Entity)
      .order_by_asc(subscription::Column::SubscriptionId)
      .all(self.db)
      .await?;
    let catalog = sv::SubscriptionType::new(self.db).catalog().await?;

    let cards = rows
      .into_iter()
      .map(|(client, subscriptions)| ClientCard {
        client,
        subscriptions: subscriptions
          .into_iter()
          .map(|subscription| SubscriptionView {
            kind: catalog.get(&subscription.subscription_type_id).cloned(),
            subscription,
          })
          .collect(),
      })
      .collect();

    Ok(cards)
  }

  /// Case-insensitive lookup by any name part or by phone digits.
  ///
  /// Filtering happens here rather than in SQL: SQLite `lower()` and `LIKE`
  /// only fold ASCII, and names are Cyrillic.
  pub async fn search(&self, text: &str) -> Result<Vec<ClientCard>> {
    let cards = self.list(true).await?;

    let query = text.trim().to_lowercase();
    if query.is_empty() {
      return Ok(cards);
    }
    let phone_query = strip_phone_punctuation(&query);

    Ok(
      cards
        .into_iter()
        .filter(|card| is_match(&card.client, &query, &phone_query))
        .collect(),
    )
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(client::Entity::find().count(self.db).await?)
  }
}

impl<'a, C: ConnectionTrait + TransactionTrait> Client<'a, C> {
  /// Removes the client together with every subscription it owns.
  pub async fn delete(&self, client_id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let client = client::Entity::find_by_id(client_id)
      .one(&txn)
      .await?
      .ok_or(Error::ClientNotFound(client_id))?;

    let removed = sv::Subscription::new(&txn).delete_by_client(client_id).await?;
    client::Entity::delete_by_id(client_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
      "Deleted client #{} ({}) with {} subscription(s)",
      client_id,
      client.full_name(),
      removed
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, patch, plan, setup_test_db};

  #[tokio::test]
  async fn test_create_and_find() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);

    let draft = ClientPatch {
      middle_name: Some("Сергеевич".into()),
      ..patch("Иванов", "Пётр")
    };
    let client = sv.create(draft.clone(), date(2024, 6, 1)).await.unwrap();
    let found = sv.by_id(client.client_id).await.unwrap().unwrap();

    assert_eq!(found, client);
    assert_eq!(found.last_name, draft.last_name);
    assert_eq!(found.first_name, draft.first_name);
    assert_eq!(found.middle_name, draft.middle_name);
    assert_eq!(found.birth_date, draft.birth_date);
    assert_eq!(found.phone, draft.phone);
    assert_eq!(found.registration_date, date(2024, 6, 1));
  }

  #[tokio::test]
  async fn test_update_keeps_registration_date() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);

    let client =
      sv.create(patch("Иванов", "Пётр"), date(2020, 3, 15)).await.unwrap();
    let updated = sv
      .update(client.client_id, ClientPatch {
        phone: "+79990000000".into(),
        ..patch("Петров", "Пётр")
      })
      .await
      .unwrap();

    assert_eq!(updated.client_id, client.client_id);
    assert_eq!(updated.last_name, "Петров");
    assert_eq!(updated.phone, "+79990000000");
    assert_eq!(updated.registration_date, date(2020, 3, 15));
  }

  #[tokio::test]
  async fn test_update_missing_client() {
    let db = setup_test_db().await;

    let res = Client::new(&db).update(42, patch("Иванов", "Пётр")).await;
    assert!(matches!(res, Err(Error::ClientNotFound(42))));
  }

  #[tokio::test]
  async fn test_delete_cascades() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);
    let month = plan(&db, 30).await;

    let client =
      sv.create(patch("Иванов", "Пётр"), date(2024, 6, 1)).await.unwrap();
    let other =
      sv.create(patch("Сидоров", "Олег"), date(2024, 6, 1)).await.unwrap();
    let subs = sv::Subscription::new(&db);
    subs
      .upsert_active(client.client_id, &month, date(2024, 6, 1))
      .await
      .unwrap();
    subs
      .upsert_active(other.client_id, &month, date(2024, 6, 1))
      .await
      .unwrap();

    sv.delete(client.client_id).await.unwrap();

    assert!(sv.by_id(client.client_id).await.unwrap().is_none());
    assert!(subs.by_client(client.client_id).await.unwrap().is_empty());
    assert!(subs.active(other.client_id).await.unwrap().is_some());
    assert_eq!(sv.count().await.unwrap(), 1);

    let res = sv.delete(client.client_id).await;
    assert!(matches!(res, Err(Error::ClientNotFound(_))));
  }

  #[tokio::test]
  async fn test_list_in_storage_order() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);
    let month = plan(&db, 30).await;

    let first =
      sv.create(patch("Яковлев", "Иван"), date(2024, 6, 1)).await.unwrap();
    let second =
      sv.create(patch("Андреев", "Олег"), date(2024, 6, 1)).await.unwrap();
    sv::Subscription::new(&db)
      .upsert_active(second.client_id, &month, date(2024, 6, 1))
      .await
      .unwrap();

    let bare = sv.list(false).await.unwrap();
    let ids: Vec<_> = bare.iter().map(|card| card.client.client_id).collect();
    assert_eq!(ids, vec![first.client_id, second.client_id]);
    assert!(bare.iter().all(|card| card.subscriptions.is_empty()));

    let full = sv.list(true).await.unwrap();
    assert_eq!(full.len(), 2);
    assert_eq!(full[0].subscription_label(), "No subscription");
    assert_eq!(full[1].subscription_label(), month.name);
    assert_eq!(full[1].active().unwrap().kind.as_ref(), Some(&month));
  }

  #[tokio::test]
  async fn test_search_by_name_and_phone() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);

    let ivanov = sv
      .create(
        ClientPatch { phone: "+7(912)345-67-89".into(), ..patch("Иванов", "Пётр") },
        date(2024, 6, 1),
      )
      .await
      .unwrap();
    let sidorova = sv
      .create(
        ClientPatch {
          middle_name: Some("Андреевна".into()),
          phone: "+79005554433".into(),
          ..patch("Сидорова", "Анна")
        },
        date(2024, 6, 1),
      )
      .await
      .unwrap();

    let ids = |cards: Vec<ClientCard>| -> Vec<i32> {
      cards.into_iter().map(|card| card.client.client_id).collect()
    };

    assert_eq!(ids(sv.search("912").await.unwrap()), vec![ivanov.client_id]);
    assert_eq!(
      ids(sv.search("+7 (912) 345").await.unwrap()),
      vec![ivanov.client_id]
    );
    assert_eq!(ids(sv.search("иВАН").await.unwrap()), vec![ivanov.client_id]);
    assert_eq!(
      ids(sv.search(" андреевна ").await.unwrap()),
      vec![sidorova.client_id]
    );
    assert_eq!(ids(sv.search("   ").await.unwrap()).len(), 2);
    assert!(sv.search("Петров").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_search_punctuation_only_matches_every_phone() {
    let db = setup_test_db().await;
    let sv = Client::new(&db);
    let today = date(2024, 6, 1);

    sv.create(patch("Иванов", "Иван"), today).await.unwrap();
    sv.create(patch("Сидорова", "Анна"), today).await.unwrap();

    for query in ["-", "+", "()", "+ -"] {
      assert_eq!(sv.search(query).await.unwrap().len(), 2, "query {query:?}");
    }
  }
}
