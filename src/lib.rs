pub mod analysis;
pub mod config;
pub mod error;
pub mod feddit;
pub mod monitor;
pub mod service;
pub mod storage;
pub mod web;
pub mod window;
