pub mod board;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod services;
pub mod state;
pub mod time;
pub mod view;
