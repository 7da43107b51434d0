//! Teamspace API Library
//!
//! Team collaboration backend: members form teams for a bounded project
//! timeframe. The core is the team lifecycle engine in
//! [`services::TeamService`], which keeps every team led by exactly one of
//! its members under concurrent joins, leaves, removals and delegations.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
