#![doc = "The `bookvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, the"]
#![doc = "multi-format import/export pipeline, routing configuration, and error"]
#![doc = "handling for the BookVault application. It is used by the main binary"]
#![doc = "(`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod formats;
pub mod google_books;
pub mod models;
pub mod routes;
