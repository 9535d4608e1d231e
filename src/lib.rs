pub mod config;
pub mod dashboard;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod wizard;
