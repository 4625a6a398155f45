//! Battle AI Script VM - scripted move and target selection for battle AI

pub mod ai;
pub mod battle;
pub mod core;
