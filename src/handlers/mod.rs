pub mod health;
pub mod traffic;
