use crate::{
  entity::{SubscriptionStatus, subscription, subscription_type},
  prelude::*,
};

pub struct Subscription<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> Subscription<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn active(
    &self,
    client_id: i32,
  ) -> Result<Option<subscription::Model>> {
    let subscription = subscription::Entity::find()
      .filter(subscription::Column::ClientId.eq(client_id))
      .filter(subscription::Column::Status.eq(SubscriptionStatus::Active))
      .order_by_asc(subscription::Column::SubscriptionId)
      .one(self.db)
      .await?;
    Ok(subscription)
  }

  pub async fn by_client(
    &self,
    client_id: i32,
  ) -> Result<Vec<subscription::Model>> {
    let subscriptions = subscription::Entity::find()
      .filter(subscription::Column::ClientId.eq(client_id))
      .order_by_asc(subscription::Column::SubscriptionId)
      .all(self.db)
      .await?;
    Ok(subscriptions)
  }

  /// Starts a plan for the client, or renews the one already active.
  ///
  /// Renewal rewrites the active row in place: plan, end date and status
  /// change, the start date and the row identity stay.
  pub async fn upsert_active(
    &self,
    client_id: i32,
    kind: &subscription_type::Model,
    start_date: Date,
  ) -> Result<subscription::Model> {
    let end_date = kind.ends_on(start_date);

    if let Some(current) = self.active(client_id).await? {
      let renewed = subscription::ActiveModel {
        subscription_type_id: Set(kind.subscription_type_id),
        end_date: Set(end_date),
        status: Set(SubscriptionStatus::Active),
        ..current.into()
      }
      .update(self.db)
      .await?;

      debug!(
        "Renewed subscription #{} of client #{} with `{}` until {}",
        renewed.subscription_id, client_id, kind.name, end_date
      );
      return Ok(renewed);
    }

    let created = subscription::ActiveModel {
      subscription_id: NotSet,
      client_id: Set(client_id),
      subscription_type_id: Set(kind.subscription_type_id),
      start_date: Set(start_date),
      end_date: Set(end_date),
      status: Set(SubscriptionStatus::Active),
    }
    .insert(self.db)
    .await?;

    debug!(
      "Started subscription #{} of client #{} with `{}` until {}",
      created.subscription_id, client_id, kind.name, end_date
    );
    Ok(created)
  }

  pub async fn delete_by_client(&self, client_id: i32) -> Result<u64> {
    let res = subscription::Entity::delete_many()
      .filter(subscription::Column::ClientId.eq(client_id))
      .exec(self.db)
      .await?;
    Ok(res.rows_affected)
  }

  pub async fn count_active(&self) -> Result<u64> {
    let count = subscription::Entity::find()
      .filter(subscription::Column::Status.eq(SubscriptionStatus::Active))
      .count(self.db)
      .await?;
    Ok(count)
  }
}
