pub use std::collections::HashMap;

pub use anyhow::Context;
pub use chrono::{
  Local, NaiveDate as Date, NaiveDateTime as DateTime, TimeDelta, Utc,
};
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database,
  DatabaseConnection, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
  QueryOrder, Set, TransactionTrait,
};
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
