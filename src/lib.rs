pub mod alerts;
pub mod api;
pub mod cli;
pub mod config;
pub mod events;
pub mod model;
pub mod poller;
pub mod prefs;
pub mod render;
pub mod state;
pub mod web;
