//! HTTP handlers for the Drinks domain

pub mod drinks;
