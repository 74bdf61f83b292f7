mod control;

pub use control::{ControlLinks, ControlTask, ImuSample};
