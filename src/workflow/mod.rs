//! Feature-placement workflow
//!
//! The state machine and its parts: location acquisition, marker gestures,
//! reverse address sync, step sequencing and the resource specialization.

mod address;
mod controller;
mod events;
mod location;
mod marker;
mod phase;
pub mod resource;
mod sidebar;
mod steps;

pub use address::{AddressUpdate, ReverseAddressSync};
pub use controller::{
    POINT_STEP_DETAILS, POINT_STEP_FINAL, POINT_STEP_LOCATE, Variant, WorkflowBuilder,
    WorkflowController,
};
pub use events::{Completion, HostEvent, Request};
pub use location::{
    Attempt, ChosenLocation, GeolocationOutcome, LocationAcquirer, LocationSource, SearchOutcome,
};
pub use marker::{MarkerGesture, MarkerMove};
pub use phase::Phase;
pub use sidebar::{Prompt, Sidebar};
pub use steps::{StepError, StepEvent, StepSequencer};
