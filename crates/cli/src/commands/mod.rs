pub mod render;
pub mod stub;
pub mod validate;
