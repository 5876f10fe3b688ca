use crate::{entity::subscription_type, prelude::*};

pub struct SubscriptionType<'a, C> {
  db: &'a C,
}

impl<'a, C: ConnectionTrait> SubscriptionType<'a, C> {
  pub fn new(db: &'a C) -> Self {
    Self { db }
  }

  pub async fn all(&self) -> Result<Vec<subscription_type::Model>> {
    let types = subscription_type::Entity::find()
      .order_by_asc(subscription_type::Column::SubscriptionTypeId)
      .all(self.db)
      .await?;
    Ok(types)
  }

  pub async fn by_id(
    &self,
    subscription_type_id: i32,
  ) -> Result<Option<subscription_type::Model>> {
    let kind = subscription_type::Entity::find_by_id(subscription_type_id)
      .one(self.db)
      .await?;
    Ok(kind)
  }

  /// Catalog keyed by id, for joining subscriptions to their plan names.
  pub async fn catalog(&self) -> Result<HashMap<i32, subscription_type::Model>> {
    let types = self.all().await?;
    Ok(types.into_iter().map(|kind| (kind.subscription_type_id, kind)).collect())
  }
}
