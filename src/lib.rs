//! Career-guidance backend: signup/login plus CRUD for users, assessments,
//! and portfolio projects, persisted to Postgres or to a single JSON file.

pub mod app;
pub mod assessments;
pub mod auth;
pub mod config;
pub mod error;
pub mod portfolios;
pub mod state;
pub mod store;
pub mod users;
