//! Interactive terminal table: one human seat (South) against three bots.

pub mod app;
pub mod controller;
mod ui;
