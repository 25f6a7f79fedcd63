//! Root binding per render surface
//!
//! Each target surface gets one persistent scene, camera and root container,
//! created on first render and reused by every later render into it.

use std::collections::HashMap;

use log::debug;

use crate::error::Result;
use crate::foundation::collections::{NodeId, ObjectId};
use crate::host::Host;
use crate::object::Value;
use crate::props::apply_prop;

/// Identity of a render surface (canvas, window, offscreen target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Persistent state bound to one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootState {
    /// Scene object everything is rendered into
    pub scene: ObjectId,
    /// Default camera
    pub camera: ObjectId,
    /// Root container node handed to the diffing engine
    pub container: NodeId,
}

/// Surface → root state mapping
#[derive(Debug, Default)]
pub struct RootRegistry {
    roots: HashMap<SurfaceId, RootState>,
}

impl RootRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Root state for `surface`, created on first use
    pub fn root(&mut self, host: &mut Host, surface: SurfaceId) -> Result<RootState> {
        if let Some(state) = self.roots.get(&surface) {
            return Ok(*state);
        }

        let scene = host.catalogue().construct("scene", &[])?;
        let scene = host.store_mut().insert(scene);
        let camera = host
            .catalogue()
            .construct("perspectiveCamera", &[Value::from(75)])?;
        let camera = host.store_mut().insert(camera);
        apply_prop(host.store_mut(), camera, "position-z", &Value::from(5))?;
        let container = host.create_root(scene)?;

        let state = RootState {
            scene,
            camera,
            container,
        };
        debug!("Bound {surface:?} to scene {scene:?}");
        self.roots.insert(surface, state);
        Ok(state)
    }

    /// Existing root state for `surface`
    pub fn get(&self, surface: SurfaceId) -> Option<RootState> {
        self.roots.get(&surface).copied()
    }

    /// Number of bound surfaces
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no surface is bound
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
