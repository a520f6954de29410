//! Persistence for subscriptions, shared feed items, and read state.

pub mod items;
pub mod subscriptions;

pub use items::{ItemRecord, ItemRepository};
pub use subscriptions::{SubscribeOutcome, Subscription, SubscriptionRepository};
