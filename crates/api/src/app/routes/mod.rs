pub mod stock;
pub mod system;
