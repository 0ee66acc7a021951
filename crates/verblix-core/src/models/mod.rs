pub mod auth;
pub mod conversation;
pub mod frame;
pub mod request;
pub mod turn;
