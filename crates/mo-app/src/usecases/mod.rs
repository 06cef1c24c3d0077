pub mod registration;
pub mod verification;
