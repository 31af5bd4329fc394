pub mod auth;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod exercise;
pub mod middlewares;
pub mod model;
pub mod progress;
pub mod remote;
pub mod routes;
pub mod startup;
pub mod state;
pub mod telemetry;
