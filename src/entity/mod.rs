//! SeaORM models of the client registry.

pub mod client;
pub mod subscription;
pub mod subscription_type;
pub mod user;

pub use subscription::SubscriptionStatus;
pub use user::Role;
