//! Logical tree nodes

use crate::attach::Attach;
use crate::foundation::collections::{NodeId, ObjectId};
use crate::props::Props;

/// Element type name reserved for opaque, externally built objects
pub const PRIMITIVE: &str = "primitive";

/// What a node was declared as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// A catalogue element such as `mesh` or `boxGeometry`
    Named(String),
    /// Wraps a pre-built object passed through the `object` property
    Primitive,
    /// Root container bound to a surface
    Root,
}

impl ElementType {
    /// Classify a declared element type name
    pub fn parse(name: &str) -> Self {
        if name == PRIMITIVE {
            Self::Primitive
        } else {
            Self::Named(name.to_owned())
        }
    }
}

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Created, no object yet
    Uncommitted,
    /// Object instantiated and initial properties applied
    Committed,
    /// Unlinked and released
    Removed,
}

/// A node in the logical tree driven by the diffing engine
#[derive(Debug, Clone)]
pub struct Node {
    element: ElementType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) object: Option<ObjectId>,
    pub(crate) props: Props,
    pub(crate) attach: Option<Attach>,
}

impl Node {
    pub(crate) fn new(element: ElementType, props: Props) -> Self {
        Self {
            element,
            parent: None,
            children: Vec::new(),
            object: None,
            props,
            attach: None,
        }
    }

    /// Declared element type
    pub fn element(&self) -> &ElementType {
        &self.element
    }

    /// Logical parent
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Logical children in declaration order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Instantiated object, absent before commit
    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    /// Declared properties
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Attach slot fixed at commit (declared or defaulted)
    pub fn attach(&self) -> Option<&Attach> {
        self.attach.as_ref()
    }

    /// Lifecycle state
    pub fn state(&self) -> NodeState {
        if self.object.is_some() {
            NodeState::Committed
        } else {
            NodeState::Uncommitted
        }
    }

    /// Whether the node's object is owned by someone else and never disposed
    pub fn is_opaque(&self) -> bool {
        matches!(self.element, ElementType::Primitive | ElementType::Root)
    }

    pub(crate) fn index_of(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}
