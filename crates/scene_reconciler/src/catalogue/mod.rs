//! Catalogue of constructible object classes
//!
//! Maps class names to constructors. Element types are declared in
//! lower-camel-case (`meshStandardMaterial`) and looked up by their
//! capitalised class name (`MeshStandardMaterial`). The catalogue is built once
//! at startup and handed to the [`Host`](crate::host::Host); extending it only
//! ever adds or replaces entries.

pub mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::error::{ReconcileError, Result};
use crate::object::{SceneObject, Value};

/// Builds a fresh object from construction arguments
pub type Constructor = Rc<dyn Fn(&[Value]) -> Result<SceneObject>>;

/// Registry of constructible classes keyed by class name
#[derive(Clone, Default)]
pub struct Catalogue {
    classes: HashMap<String, Constructor>,
}

impl fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.classes.keys().collect();
        names.sort();
        f.debug_struct("Catalogue").field("classes", &names).finish()
    }
}

impl Catalogue {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue holding the built-in classes
    pub fn with_defaults() -> Self {
        let mut catalogue = Self::new();
        catalogue.extend(builtin::classes());
        catalogue
    }

    /// Register a single class
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&[Value]) -> Result<SceneObject> + 'static,
    ) {
        self.extend([(name.into(), Rc::new(constructor) as Constructor)]);
    }

    /// Merge additional classes into the catalogue
    ///
    /// Entries are only ever added; a name that is already registered is
    /// replaced by the new constructor.
    pub fn extend<N: Into<String>>(&mut self, objects: impl IntoIterator<Item = (N, Constructor)>) {
        for (name, constructor) in objects {
            let name = name.into();
            if self.classes.insert(name.clone(), constructor).is_some() {
                debug!("Catalogue entry {name} replaced");
            }
        }
    }

    /// Whether an element type resolves to a registered class
    pub fn contains(&self, element_type: &str) -> bool {
        self.classes.contains_key(&class_name(element_type))
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no classes are registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Construct an object for an element type
    pub fn construct(&self, element_type: &str, args: &[Value]) -> Result<SceneObject> {
        let name = class_name(element_type);
        let constructor = self
            .classes
            .get(&name)
            .ok_or_else(|| ReconcileError::UnknownType(name.clone()))?;
        debug!("Constructing {name} with {} args", args.len());
        constructor(args)
    }
}

/// Class name for an element type: the first letter capitalised
pub fn class_name(element_type: &str) -> String {
    let mut chars = element_type.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
