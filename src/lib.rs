pub mod app;
pub mod config;
pub mod models;
pub mod proxy;
pub mod tmdb;
pub mod utils;
pub mod views;
