//! Sensor Pilot - PLC/sensor diagram synchronization with live weather
//!
//! Users draw diagrams of sensors wired to PLC ports; each sensor sits at a
//! named place. This crate keeps the stored associations aligned with the
//! latest diagram, refreshes weather for every known place, and pushes
//! updated sensor readings to the users watching them over WebSocket.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
