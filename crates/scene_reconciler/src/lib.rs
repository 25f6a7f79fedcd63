//! # Scene Reconciler
//!
//! Drives a mutable 3D scene graph from a declarative component tree.
//!
//! An external tree-diffing engine decides *what* changed; this crate is the
//! host it calls to make those changes real on the scene graph.
//!
//! ## Components
//!
//! - **Path Resolver**: dashed property paths (`material-color`, `position-x`)
//! - **Property Applier**: copy / set / scalar / assign strategies
//! - **Attachment Manager**: attach slots with restore on detach
//! - **Catalogue**: element type name → constructor registry
//! - **Host**: node lifecycle, structural edits, deferred disposal
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_reconciler::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut host = Host::default();
//!     let mut roots = RootRegistry::new();
//!     let root = roots.root(&mut host, SurfaceId(1))?;
//!
//!     let mesh = host.create("mesh", Props::new().with("position", Value::list([
//!         Value::from(0), Value::from(1), Value::from(0),
//!     ])));
//!     let material = host.create(
//!         "meshStandardMaterial",
//!         Props::new().with("color", "hotpink"),
//!     );
//!     host.append(root.container, mesh)?;
//!     host.append(mesh, material)?;
//!
//!     host.remove(root.container, mesh)?;
//!     host.flush_disposals();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod error;
pub mod object;
pub mod props;
pub mod attach;
pub mod catalogue;
pub mod config;
pub mod host;
pub mod roots;

pub use error::{ReconcileError, Result};

/// Common imports for reconciler users
pub mod prelude {
    pub use crate::{
        attach::{Attach, AttachmentManager, Detach},
        catalogue::Catalogue,
        config::{Config, ConfigError, DisposalPolicy, ReconcilerConfig},
        error::{ReconcileError, Result},
        foundation::collections::{NodeId, ObjectId},
        host::{Host, HostConfig, NodeState},
        object::{MathValue, ObjectKind, ObjectStore, SceneObject, Value},
        props::{Prop, Props},
        roots::{RootRegistry, RootState, SurfaceId},
    };
}
