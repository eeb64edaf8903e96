//! SeaORM entity definitions

pub mod device;
pub mod user;
