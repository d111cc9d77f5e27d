//! Speech Companion - Guided Speech-Practice Session Core
//!
//! This crate implements the session lifecycle tracker for the companion
//! application: the in-memory and persisted model of "what is happening
//! right now" during a timed practice session.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
