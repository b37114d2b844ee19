pub mod comments;
pub mod health;
pub mod likes;
pub mod profile;
pub mod users;
