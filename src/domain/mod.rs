//! Domain layer - core business logic and entities

pub mod alert;
pub mod notification;
pub mod price;
