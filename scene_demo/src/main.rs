//! Scene reconciler demo
//!
//! Plays the part of the diffing engine for a small declared scene: a lit
//! group of meshes is mounted, updated, reordered and partly unmounted, and
//! the resulting scene graph is logged after each pass.
//!
//! Run with `RUST_LOG=debug cargo run -p scene_demo [config.toml]`.

use scene_reconciler::foundation::logging;
use scene_reconciler::prelude::*;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

struct Demo {
    host: Host,
    roots: RootRegistry,
}

impl Demo {
    fn new(config: ReconcilerConfig) -> Self {
        let mut catalogue = Catalogue::with_defaults();
        catalogue.register("Starfield", |args: &[Value]| {
            let count = args.first().and_then(Value::as_number).unwrap_or(100.0);
            Ok(SceneObject::new("Starfield", ObjectKind::Graph).with_field("count", count))
        });

        Self {
            host: Host::new(catalogue, config),
            roots: RootRegistry::new(),
        }
    }

    fn mesh(&mut self, parent: NodeId, name: &str, x: f64, color: &str) -> Result<NodeId> {
        let mesh = self.host.create(
            "mesh",
            Props::new()
                .with("name", name)
                .with("position", Value::list([Value::from(x), Value::from(0), Value::from(0)])),
        );
        let geometry = self.host.create(
            "boxGeometry",
            Props::new().with(
                "args",
                Value::list([Value::from(1), Value::from(1), Value::from(1)]),
            ),
        );
        let material = self
            .host
            .create("meshStandardMaterial", Props::new().with("color", color));

        self.host.append(parent, mesh)?;
        self.host.append(mesh, geometry)?;
        self.host.append(mesh, material)?;
        Ok(mesh)
    }

    fn log_scene(&self, scene: ObjectId, label: &str) {
        log::info!("Scene after {label}:");
        let store = self.host.store();
        for id in store.traverse(scene) {
            let Some(object) = store.get(id) else {
                continue;
            };
            let name = object.field("name");
            log::info!(
                "  {} {:?} name={:?} children={}",
                object.class(),
                id,
                name.as_text().unwrap_or_default(),
                object.children().len()
            );
        }
    }

    fn run(&mut self) -> Result<()> {
        let root = self.roots.root(&mut self.host, SurfaceId(0))?;
        let container = root.container;

        // Mount
        let light = self.host.create(
            "pointLight",
            Props::new()
                .with("args", Value::list([Value::from("white"), Value::from(2)]))
                .with("position-y", 4),
        );
        self.host.append(container, light)?;

        let group = self.host.create("group", Props::new().with("name", "fleet"));
        self.host.append(container, group)?;
        let left = self.mesh(group, "left", -2.0, "royalblue")?;
        let middle = self.mesh(group, "middle", 0.0, "hotpink")?;
        let right = self.mesh(group, "right", 2.0, "orange")?;

        let stars = self.host.create("starfield", Props::new().with("args", 500));
        self.host.append(container, stars)?;
        self.log_scene(root.scene, "mount");

        // Update
        self.host.set_prop(middle, "scale", 1.5)?;
        let rotation = Value::list([Value::from(0), Value::from(0.5), Value::from(0)]);
        self.host.set_prop(middle, "rotation", rotation)?;
        self.host.set_prop(left, "visible", false)?;

        // Reorder: move the right mesh to the front
        self.host.insert(group, right, Some(left))?;
        self.log_scene(root.scene, "reorder");

        // Unmount
        self.host.remove(group, middle)?;
        self.host.remove(container, stars)?;
        log::info!("{} disposals pending", self.host.pending_disposals());
        self.log_scene(root.scene, "unmount");

        let budget = self.host.config().idle_budget;
        while self.host.pending_disposals() > 0 {
            let done = self.host.run_idle(budget);
            log::debug!("Idle slice ran {done} disposals");
        }
        log::info!(
            "{} objects live, {} disposed",
            self.host.store().len(),
            self.host.store().disposed_count()
        );
        Ok(())
    }
}

fn load_config() -> std::result::Result<ReconcilerConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            ReconcilerConfig::load_from_file(&path)?
        }
        None => ReconcilerConfig::default(),
    };
    config.validate().map_err(DemoError::InvalidConfig)?;
    Ok(config)
}

fn main() {
    logging::init();

    let result =
        load_config().and_then(|config| Demo::new(config).run().map_err(DemoError::from));
    if let Err(e) = result {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
