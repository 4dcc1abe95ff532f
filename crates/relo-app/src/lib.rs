//! Client-side workflow coordinator.
//!
//! [`Session`] is a synchronous state machine: it consumes a [`Message`],
//! updates itself and returns an [`Action`] describing the side effect to
//! run. [`Engine`] runs those actions against a
//! [`relo_runtime::Backend`] and feeds the responses back in as messages.

pub mod action;
pub mod autosave;
pub mod catalog;
pub mod connection;
pub mod engine;
pub mod message;
pub mod rules;
pub mod session;
pub mod workflow;

pub use action::{Action, Request};
pub use autosave::{Autosave, AUTOSAVE_DELAY};
pub use connection::{ConnectionEdit, ConnectionStatus};
pub use engine::Engine;
pub use message::Message;
pub use rules::{RuleEdit, RuleSet};
pub use session::Session;
