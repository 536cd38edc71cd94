pub mod analysis;
pub mod chat;
pub mod contact;
pub mod health;
pub mod places;
