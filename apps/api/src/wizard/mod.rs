// Session-scoped onboarding wizard, reproduced server side.
// State lives in memory only and is lost on restart.

pub mod handlers;
pub mod session;
pub mod store;

pub use session::{SessionView, WizardSession};
pub use store::SessionStore;
