pub mod health;
pub mod metadata;
