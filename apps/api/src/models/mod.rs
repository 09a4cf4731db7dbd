pub mod application;
pub mod screening;
