//! Transit route planner.
//!
//! A weighted directed graph of named locations, shortest-path route finding
//! under several cost criteria, and a questionnaire that turns a traveller's
//! answers into a preference profile for weighted routing.

pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod preferences;
pub mod store;
pub mod web;
