//! HTTP surface for the inventory core.

pub mod app;
