pub mod registry;
pub mod session;

pub use registry::{SessionRegistry, SharedSession, acquire};
pub use session::{RegistrationSession, SessionView};
