pub mod client;
pub mod subscription;
pub mod subscription_type;
pub mod user;

pub use client::{Client, ClientCard, ClientPatch, SubscriptionView};
pub use subscription::Subscription;
pub use subscription_type::SubscriptionType;
pub use user::{Session, User};
