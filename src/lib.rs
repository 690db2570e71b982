pub mod analytics;
pub mod app;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod redirect;
pub mod storage;
pub mod web;
