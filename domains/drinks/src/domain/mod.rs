//! Drinks domain layer: menu entities and their public views

pub mod entities;
