//! Reconciliation host
//!
//! The bridge between an external tree-diffing engine and the scene graph.
//! The engine creates nodes, sets their properties and links them; the host
//! turns that into object construction, property writes, attach slots and
//! graph mutations.
//!
//! Node lifecycle: **uncommitted** (declared, no object) → **committed**
//! (object built on the first insertion that needs it, properties applied,
//! linked) → **removed** (unlinked, object disposed, node released).
//!
//! All operations are synchronous and run on the caller's thread. Errors
//! abort the operation without rolling back what already happened.

pub mod disposal;
pub mod node;


use log::{debug, trace, warn};

use crate::attach::{Attach, AttachmentManager};
use crate::catalogue::Catalogue;
use crate::config::{DisposalPolicy, ReconcilerConfig};
use crate::error::{ReconcileError, Result};
use crate::foundation::collections::{NodeId, ObjectId, SlotMap};
use crate::object::{ObjectKind, ObjectStore};
use crate::props::{self, apply_prop, apply_props, Prop, Props};

pub use disposal::{DisposalQueue, Ticket};
pub use node::{ElementType, Node, NodeState, PRIMITIVE};

/// The operations a tree-diffing engine expects from its host
///
/// Instances are opaque handles; the engine never looks inside them.
pub trait HostConfig {
    /// Handle the engine holds for each created element
    type Instance: Copy;

    /// Create an element with its initial properties
    fn create_instance(&mut self, element_type: &str, props: Props) -> Result<Self::Instance>;

    /// Create literal text content
    fn create_text_instance(&mut self, text: &str) -> Result<Self::Instance>;

    /// Update a single property
    fn set_property(&mut self, instance: Self::Instance, key: &str, prop: Prop) -> Result<()>;

    /// Link `child` as the last child of `parent`
    fn append_child(&mut self, parent: Self::Instance, child: Self::Instance) -> Result<()>;

    /// Link `child` under `parent` immediately before `before`
    fn insert_before(
        &mut self,
        parent: Self::Instance,
        child: Self::Instance,
        before: Self::Instance,
    ) -> Result<()>;

    /// Unlink `child` from `parent` and release it
    fn remove_child(&mut self, parent: Self::Instance, child: Self::Instance) -> Result<()>;

    /// Parent of an instance
    fn parent(&self, instance: Self::Instance) -> Option<Self::Instance>;

    /// First child of an instance
    fn first_child(&self, instance: Self::Instance) -> Option<Self::Instance>;

    /// Next sibling of an instance
    fn next_sibling(&self, instance: Self::Instance) -> Option<Self::Instance>;
}

/// Reconciliation host over an [`ObjectStore`]
#[derive(Debug)]
pub struct Host {
    store: ObjectStore,
    catalogue: Catalogue,
    attachments: AttachmentManager,
    nodes: SlotMap<NodeId, Node>,
    disposals: DisposalQueue,
    config: ReconcilerConfig,
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Catalogue::with_defaults(), ReconcilerConfig::default())
    }
}

impl Host {
    /// Create a host around a catalogue built at startup
    pub fn new(catalogue: Catalogue, config: ReconcilerConfig) -> Self {
        debug!(
            "Reconciliation host ready: {} classes, {:?} disposal",
            catalogue.len(),
            config.disposal
        );
        Self {
            store: ObjectStore::new(),
            catalogue,
            attachments: AttachmentManager::new(),
            nodes: SlotMap::with_key(),
            disposals: DisposalQueue::new(),
            config,
        }
    }

    /// Scene objects
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Scene objects, mutably (for building opaque objects)
    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    /// Constructible classes
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Constructible classes, mutably (for extending at startup)
    pub fn catalogue_mut(&mut self) -> &mut Catalogue {
        &mut self.catalogue
    }

    /// Active configuration
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(ReconcileError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(ReconcileError::UnknownNode(id))
    }

    /// Lifecycle state of a node; released handles report [`NodeState::Removed`]
    pub fn state(&self, id: NodeId) -> NodeState {
        self.nodes.get(id).map_or(NodeState::Removed, Node::state)
    }

    /// Object of a committed node
    pub fn object_of(&self, id: NodeId) -> Option<ObjectId> {
        self.nodes.get(id)?.object
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Disposal tasks waiting for an idle slice
    pub fn pending_disposals(&self) -> usize {
        self.disposals.len()
    }

    // -- Creation --

    /// Allocate an uncommitted node.
    ///
    /// The node starts with an empty `args` list; `props` are layered on top.
    /// No object is built until the node is first inserted.
    pub fn create(&mut self, element_type: &str, props: Props) -> NodeId {
        let mut declared = Props::args_only();
        for (key, prop) in props.iter() {
            declared.set(key, prop.clone());
        }
        let id = self.nodes.insert(Node::new(ElementType::parse(element_type), declared));
        trace!("Created {element_type} node {id:?}");
        id
    }

    /// Allocate a committed root container around an existing graph object
    pub fn create_root(&mut self, object: ObjectId) -> Result<NodeId> {
        self.store.object(object)?;
        let mut node = Node::new(ElementType::Root, Props::new());
        node.object = Some(object);
        let id = self.nodes.insert(node);
        debug!("Created root {id:?} for {object:?}");
        Ok(id)
    }

    /// Text content is never part of a scene tree
    pub fn create_text(&mut self, text: &str) -> Result<NodeId> {
        Err(ReconcileError::TextNode(text.to_owned()))
    }

    // -- Properties --

    /// Store a declared property and, once committed, apply it to the object.
    ///
    /// Changes to `args` after commit are kept but never re-applied.
    pub fn set_prop(&mut self, id: NodeId, key: &str, prop: impl Into<Prop>) -> Result<()> {
        let prop = prop.into();
        let node = self.node_mut(id)?;
        node.props.set(key, prop.clone());
        let Some(object) = node.object else {
            return Ok(());
        };

        match (key, &prop) {
            (props::ARGS, _) => {
                debug!(
                    "{id:?} changed `args` after commit; construction arguments are not re-applied"
                );
                Ok(())
            }
            (props::ATTACH, _) => {
                debug!("{id:?} changed `attach` after commit; it takes effect when next inserted");
                Ok(())
            }
            (key, Prop::Value(value)) => apply_prop(&mut self.store, object, key, value),
            (key, Prop::Attach(_)) => {
                warn!("Attach descriptor declared under `{key}` on {id:?} is ignored");
                Ok(())
            }
        }
    }

    /// Instantiate a node's object if it has none yet.
    ///
    /// Builds the object (catalogue lookup, or the supplied object for opaque
    /// nodes), fixes the attach slot, then applies every declared property.
    fn commit(&mut self, id: NodeId) -> Result<ObjectId> {
        let node = self.node(id)?;
        if let Some(object) = node.object {
            return Ok(object);
        }
        let props = node.props.clone();
        let element = node.element().clone();

        let object = match &element {
            ElementType::Named(name) => {
                let built = self.catalogue.construct(name, &props.args())?;
                self.store.insert(built)
            }
            ElementType::Primitive => {
                let object = props.object().ok_or(ReconcileError::MissingObject)?;
                self.store.object(object)?;
                if self.disposals.cancel_object(object) {
                    debug!("{object:?} reused before its disposal ran");
                }
                object
            }
            ElementType::Root => {
                return Err(ReconcileError::InvalidHierarchy(format!(
                    "root {id:?} has no object"
                )));
            }
        };

        let attach = props.attach().or_else(|| self.default_attach(object));
        let node = self.node_mut(id)?;
        node.object = Some(object);
        node.attach = attach;

        apply_props(&mut self.store, object, &props)?;
        debug!("Committed {id:?} as {object:?}");
        Ok(object)
    }

    fn default_attach(&self, object: ObjectId) -> Option<Attach> {
        let slots = &self.config.auto_attach;
        match self.store.get(object)?.kind() {
            ObjectKind::Geometry => Some(Attach::path(slots.geometry.clone())),
            ObjectKind::Material => Some(Attach::path(slots.material.clone())),
            ObjectKind::Graph | ObjectKind::Resource => None,
        }
    }

    // -- Structure --

    /// Link `child` under `parent`, before `before` or at the end.
    ///
    /// Uncommitted parents and children are committed first. A child that is
    /// already linked somewhere is moved. Children with an attach slot are
    /// installed into it; otherwise graph children are spliced into the
    /// parent's graph at the position matching `before`.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) -> Result<()> {
        if parent == child || before == Some(child) {
            return Err(ReconcileError::InvalidHierarchy(format!(
                "{child:?} cannot be linked relative to itself"
            )));
        }
        let parent_object = self.commit(parent)?;
        let child_object = self.commit(child)?;

        if let Some(old_parent) = self.node(child)?.parent {
            self.unlink_physical(old_parent, child)?;
            self.unlink_logical(old_parent, child)?;
        }
        self.link_logical(parent, child, before)?;

        // The child is detached here, so a changed `attach` prop can take over.
        let attach = self
            .node(child)?
            .props
            .attach()
            .or_else(|| self.default_attach(child_object));
        self.node_mut(child)?.attach.clone_from(&attach);
        if let Some(attach) = attach {
            return self
                .attachments
                .attach(&mut self.store, parent_object, child_object, &attach);
        }
        if !self.both_graph(parent_object, child_object)? {
            trace!("{child:?} is not a graph child of {parent:?}; linked logically only");
            return Ok(());
        }
        match before.and_then(|b| self.graph_position(parent, b)) {
            Some(index) => self.store.insert_at(parent_object, child_object, index),
            None => self.store.add(parent_object, child_object),
        }
    }

    /// Link `child` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert(parent, child, None)
    }

    /// Unlink `child` from `parent` and release its subtree.
    ///
    /// Objects of the subtree are disposed unless the node wraps an opaque
    /// object or declared `dispose={null}`. With deferred disposal they stay
    /// alive until [`Host::run_idle`] reaches them.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(ReconcileError::InvalidHierarchy(format!(
                "{child:?} is not a child of {parent:?}"
            )));
        }
        self.unlink_physical(parent, child)?;
        self.unlink_logical(parent, child)?;
        self.release_subtree(child)
    }

    fn link_logical(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<()> {
        let node = self.node_mut(parent)?;
        let index = match before {
            Some(before) => node.index_of(before).ok_or_else(|| {
                ReconcileError::InvalidHierarchy(format!("{before:?} is not a child of {parent:?}"))
            })?,
            None => node.children.len(),
        };
        node.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn unlink_logical(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node_mut(parent)?.children.retain(|&c| c != child);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    fn unlink_physical(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let (Some(parent_object), Some(child_object)) =
            (self.object_of(parent), self.object_of(child))
        else {
            return Ok(());
        };
        match self.node(child)?.attach.clone() {
            Some(attach) => self
                .attachments
                .detach(&mut self.store, parent_object, child_object, &attach),
            None => {
                if self.store.get(child_object).and_then(|o| o.parent()) == Some(parent_object) {
                    self.store.remove_child(parent_object, child_object)?;
                }
                Ok(())
            }
        }
    }

    fn both_graph(&self, parent: ObjectId, child: ObjectId) -> Result<bool> {
        Ok(self.store.object(parent)?.kind().is_graph()
            && self.store.object(child)?.kind().is_graph())
    }

    /// Graph index matching the logical position of `before`.
    ///
    /// Uses `before` itself if it is in the parent's graph, else the next
    /// logical sibling that is. `None` means append.
    fn graph_position(&self, parent: NodeId, before: NodeId) -> Option<usize> {
        let parent_node = self.nodes.get(parent)?;
        let parent_object = parent_node.object?;
        let start = parent_node.index_of(before)?;
        parent_node.children[start..]
            .iter()
            .filter_map(|&sibling| self.object_of(sibling))
            .find_map(|object| self.store.index_of(parent_object, object))
    }

    /// Free the nodes under `root` (already unlinked) and dispose their objects.
    ///
    /// Attached descendants are detached first, deepest first, so every slot
    /// gets its previous occupant back. Graph children of opaque nodes are
    /// taken out of that graph too, since the opaque object outlives the
    /// subtree.
    fn release_subtree(&mut self, root: NodeId) -> Result<()> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            stack.extend(self.node(id)?.children.iter().copied());
            order.push(id);
        }

        for &id in order.iter().rev() {
            let node = self.node(id)?;
            let Some(parent) = node.parent else {
                continue;
            };
            if node.attach.is_some() || self.node(parent)?.is_opaque() {
                self.unlink_physical(parent, id)?;
            }
        }

        for id in order {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            let Some(object) = node.object else {
                continue;
            };
            if node.is_opaque() || node.props.dispose_suppressed() {
                trace!("Skipping disposal of {object:?} held by {id:?}");
                continue;
            }
            self.schedule_disposal(object);
        }
        Ok(())
    }

    fn schedule_disposal(&mut self, object: ObjectId) {
        match self.config.disposal {
            DisposalPolicy::Immediate => self.dispose_object(object),
            DisposalPolicy::Deferred => {
                self.disposals.enqueue(object);
            }
        }
    }

    fn dispose_object(&mut self, object: ObjectId) {
        if self.store.dispose(object) {
            self.attachments.forget(object);
        } else {
            trace!("{object:?} was already gone at disposal");
        }
    }

    /// Run up to `budget` pending disposals. Returns how many ran.
    pub fn run_idle(&mut self, budget: usize) -> usize {
        let batch = self.disposals.drain(budget);
        let count = batch.len();
        for object in batch {
            self.dispose_object(object);
        }
        if count > 0 {
            debug!("Idle slice disposed {count} objects, {} pending", self.disposals.len());
        }
        count
    }

    /// Run every pending disposal
    pub fn flush_disposals(&mut self) -> usize {
        self.run_idle(self.disposals.len())
    }

    // -- Navigation --

    /// Logical parent of a node
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// First logical child of a node
    pub fn first_child_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.children.first().copied()
    }

    /// Next logical sibling of a node
    pub fn next_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(self.parent_of(id)?)?;
        let index = parent.index_of(id)?;
        parent.children.get(index + 1).copied()
    }
}

impl HostConfig for Host {
    type Instance = NodeId;

    fn create_instance(&mut self, element_type: &str, props: Props) -> Result<NodeId> {
        Ok(self.create(element_type, props))
    }

    fn create_text_instance(&mut self, text: &str) -> Result<NodeId> {
        self.create_text(text)
    }

    fn set_property(&mut self, instance: NodeId, key: &str, prop: Prop) -> Result<()> {
        self.set_prop(instance, key, prop)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.append(parent, child)
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) -> Result<()> {
        self.insert(parent, child, Some(before))
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.remove(parent, child)
    }

    fn parent(&self, instance: NodeId) -> Option<NodeId> {
        self.parent_of(instance)
    }

    fn first_child(&self, instance: NodeId) -> Option<NodeId> {
        self.first_child_of(instance)
    }

    fn next_sibling(&self, instance: NodeId) -> Option<NodeId> {
        self.next_sibling_of(instance)
    }
}
