pub mod access;
pub mod admin;
pub mod persona;
pub mod verification;
