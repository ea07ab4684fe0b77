pub mod access;
pub mod persona;
pub mod repository;
pub mod types;
