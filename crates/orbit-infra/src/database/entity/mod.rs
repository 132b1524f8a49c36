//! SeaORM entities, one per table.

pub mod comment;
pub mod friend_request;
pub mod notification;
pub mod post;
pub mod user;
