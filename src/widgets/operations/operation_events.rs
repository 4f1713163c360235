//! Operations form events.

use crate::entities::operation::BinaryOp;

/// Show the operations form tab.
#[derive(Clone, Debug)]
pub struct OpenOperationsEvent;

/// Hide the form without creating anything.
#[derive(Clone, Debug)]
pub struct CancelOperationsEvent;

#[derive(Clone, Debug)]
pub struct CreateDerivedEvent {
    pub op: BinaryOp,
    pub a: String,
    pub b: String,
}
