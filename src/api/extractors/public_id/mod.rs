/*
 * Responsibility
 *  - Ties core and types together
 *  - Controls which types handlers can see
 */
mod core;
mod types;

pub use types::*;
