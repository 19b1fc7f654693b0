//! Entity wrappers: borrowed, immutable views that pair a validated snapshot
//! with `now` and the display policy. Rebuilt per request, never cached.

pub mod consultation_entity;
pub mod payment_entity;
pub mod subscription_entity;

pub use consultation_entity::ConsultationEntity;
pub use payment_entity::PaymentEntity;
pub use subscription_entity::SubscriptionEntity;
