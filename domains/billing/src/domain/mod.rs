//! Domain layer for billing

pub mod entities;
