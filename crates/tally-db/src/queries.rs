//! Query functions, one module per counter family.

pub mod appts;
pub mod blitz;
pub mod gym;
pub mod sales;
