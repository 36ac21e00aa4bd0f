pub mod describe;
pub mod export;
pub mod validate;
