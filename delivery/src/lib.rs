pub mod config;
pub mod delivery_actors;
pub mod delivery_core;
pub mod messages;
