pub mod config;
pub mod wallets;
