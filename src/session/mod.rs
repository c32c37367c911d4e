//! Chat session: state, transitions and the controller that drives them.
//!
//! [`Session`] is plain data. [`Session::apply`] is the only way it changes,
//! so every transition the controller performs can be replayed in a test
//! without a network.

pub mod controller;
pub mod state;

pub use controller::SessionController;
pub use state::{transition, Session, SessionEvent, Step};
