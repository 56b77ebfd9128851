pub mod auth;
pub mod config;
pub mod db;
pub mod engine;
pub mod error_convert;
pub mod health;
pub mod mailgun;
pub mod openapi;
pub mod repo;
pub mod rest;
pub mod telemetry;
