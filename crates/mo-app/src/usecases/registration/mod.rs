mod context;
mod controller;
mod error;

pub use context::{RegistrationContext, RegistrationSession};
pub use controller::{RegistrationController, RegistrationDeps};
pub use error::ControllerError;
