pub mod errors;
pub mod manga;
