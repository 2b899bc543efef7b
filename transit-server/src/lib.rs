//! Transit trip planner server.
//!
//! A backend for a map dashboard that answers: "how do I get from here to
//! there by bus and metro?", alongside live bus positions, stop lookup and
//! a small carpool board.

pub mod cache;
pub mod carpool;
pub mod config;
pub mod domain;
pub mod feed;
pub mod planner;
pub mod routing;
pub mod stops;
pub mod web;
