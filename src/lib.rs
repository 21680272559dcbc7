//! Robo Mission — a side-scrolling thrust-and-fuel arcade game.
//!
//! The library holds everything that is not terminal I/O:
//!
//! - [`entities`] – Robo, obstacles, the fuel cell and the per-frame input snapshot
//! - [`events`] – the notification interface the simulation pushes to presenters
//! - [`world`] – the frame-stepped simulation itself
//! - [`config`] – INI configuration and high-score persistence
//! - [`input`] – time-based tap/hold tracking for terminal key events

pub mod config;
pub mod entities;
pub mod events;
pub mod input;
pub mod world;
