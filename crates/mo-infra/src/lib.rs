pub mod directory;
pub mod events;
pub mod sandbox;

pub use directory::{FileBankDirectory, FileCategoryCatalog};
pub use events::TracingRegistrationEvents;
pub use sandbox::{SandboxIdentityVerification, SandboxRegistrationService, SandboxRegistry};
