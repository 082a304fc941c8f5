pub mod agenda;
pub mod auth;
pub mod contract;
pub mod inventory;
