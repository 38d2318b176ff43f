pub mod config;
pub mod error;
pub mod models;
pub mod saved;
pub mod screens;
pub mod storage;
pub mod tmdb;
