use thiserror::Error;

use crate::tree::NodeId;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} is not in the tree")]
    UnknownNode(NodeId),
    #[error("the root panel must always be the root node")]
    RootReparent,
    #[error("the root panel's bounds are fixed to the display")]
    RootBoundsFixed,
    #[error("the root panel cannot be disposed")]
    RootDispose,
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("node {child:?} is already attached to {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle { child: NodeId, parent: NodeId },
    #[error("node {0:?} is still attached; remove it before disposing")]
    DisposeAttached(NodeId),
    #[error("node {id:?} is a {actual}, not a {expected}")]
    WidgetType {
        id: NodeId,
        expected: &'static str,
        actual: &'static str,
    },
}
