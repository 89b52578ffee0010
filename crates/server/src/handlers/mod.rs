//! Request handlers

pub mod entries;
pub mod health;
pub mod pages;
