//! Transit network graph engine.
//!
//! Answers three questions over a metro network: which links form the
//! cheapest tree connecting every station, what is the cheapest static path
//! between two stations, and when is the earliest I can reach a stop given
//! the day's timetable.

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod provider;
pub mod timetable;
pub mod web;
