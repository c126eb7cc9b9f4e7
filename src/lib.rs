//! feature-placement - guided placement of map features
//!
//! A headless controller for adding a geo-located feature (a tree/plot or a
//! mapped resource) to a map-backed inventory: choose a location, refine it by
//! dragging a marker, fill in attributes and submit. The host page renders the
//! [`workflow::Sidebar`] model and forwards user gestures; asynchronous lookups
//! are executed by [`session::Session`] against the [`services`] traits.

pub mod config;
pub mod error;
pub mod form;
pub mod mode;
pub mod services;
pub mod session;
pub mod submit;
pub mod types;
pub mod workflow;

pub use config::WorkflowConfig;
pub use error::{Error, Result};
pub use mode::{ModeManager, ModePredicate, ModeToken};
pub use session::{Input, Session, SessionHandle};
pub use workflow::{Phase, WorkflowBuilder, WorkflowController};
