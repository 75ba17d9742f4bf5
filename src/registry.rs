use parking_lot::{Mutex, RwLock};
use std::{
    collections::{BTreeMap, BTreeSet},
    iter,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tracing::{debug, error};

use crate::{
    any::{TypeInfo, Value},
    config::Config,
    entry::{Entry, EntryKind},
    errors::AddErrorKind,
    node::Node,
    validator::CycleCache,
};

pub(crate) const ROOT_SCOPE: &str = "<root>";

#[derive(Clone)]
pub(crate) enum Provider {
    Value(Value),
    Node(Arc<Node>),
}

/// One scope layer: the entries registered in it and the layer it falls back to.
pub(crate) struct Registry {
    pub(crate) name: String,
    pub(crate) config: Config,
    pub(crate) parent: Option<Arc<Registry>>,
    providers: RwLock<BTreeMap<TypeInfo, Provider>>,
    /// Bumped by every registration
    generation: AtomicU64,
    pub(crate) cycles: Mutex<CycleCache>,
}

impl Registry {
    #[must_use]
    pub(crate) fn root(config: Config) -> Self {
        Self {
            name: ROOT_SCOPE.to_owned(),
            config,
            parent: None,
            providers: RwLock::new(BTreeMap::new()),
            generation: AtomicU64::new(0),
            cycles: Mutex::new(CycleCache::default()),
        }
    }

    #[must_use]
    pub(crate) fn child(parent: Arc<Self>, name: String) -> Self {
        Self {
            name,
            config: parent.config,
            parent: Some(parent),
            providers: RwLock::new(BTreeMap::new()),
            generation: AtomicU64::new(0),
            cycles: Mutex::new(CycleCache::default()),
        }
    }

    /// Copy of the layer with fresh node state.
    /// Nodes already realized keep their value, the rest start unrealized.
    /// The parent layer is shared, not copied.
    #[must_use]
    pub(crate) fn fork(&self) -> Self {
        let cycles = self.cycles.lock().clone();
        let guard = self.providers.read();
        let generation = self.generation.load(Ordering::Acquire);
        let providers = guard
            .iter()
            .map(|(type_info, provider)| {
                let provider = match provider {
                    Provider::Value(value) => Provider::Value(value.clone()),
                    Provider::Node(node) => Provider::Node(Arc::new(node.fork())),
                };
                (*type_info, provider)
            })
            .collect();

        Self {
            name: self.name.clone(),
            config: self.config,
            parent: self.parent.clone(),
            providers: RwLock::new(providers),
            generation: AtomicU64::new(generation),
            cycles: Mutex::new(cycles),
        }
    }

    /// This layer followed by its ancestors.
    pub(crate) fn layers(&self) -> impl Iterator<Item = &Registry> {
        iter::successors(Some(self), |registry| registry.parent.as_deref())
    }

    /// Generation of this layer followed by those of its ancestors.
    pub(crate) fn generations(&self) -> Vec<u64> {
        self.layers().map(|layer| layer.generation.load(Ordering::Acquire)).collect()
    }

    /// Registers a batch, all or nothing.
    ///
    /// Child layers are not consulted: a type registered here after a child registered it
    /// stays shadowed by the child's entry for lookups from the child.
    ///
    /// # Errors
    /// Returns [`AddErrorKind::AlreadyRegistered`] for the first entry whose injection type
    /// is already held by this layer, an ancestor layer, or an earlier entry of the batch.
    pub(crate) fn register(&self, entries: Vec<Entry>) -> Result<(), AddErrorKind> {
        let mut providers = self.providers.write();

        let mut batch = BTreeSet::new();
        for entry in &entries {
            let type_info = entry.type_info;

            let holder = if providers.contains_key(&type_info) || !batch.insert(type_info) {
                Some(&self.name)
            } else {
                self.layers()
                    .skip(1)
                    .find(|registry| registry.contains(&type_info))
                    .map(|registry| &registry.name)
            };

            if let Some(scope) = holder {
                let err = AddErrorKind::AlreadyRegistered {
                    entry: entry.describe(),
                    type_info,
                    scope: scope.clone(),
                };
                error!("{}", err);
                return Err(err);
            }
        }

        for entry in entries {
            let provider = match entry.kind {
                EntryKind::Value(value) => Provider::Value(value),
                EntryKind::Constructor(constructor) => Provider::Node(Arc::new(Node::new(constructor))),
            };
            debug!(injection_type = %entry.type_info, scope = %self.name, "Registered");
            providers.insert(entry.type_info, provider);
        }
        self.generation.fetch_add(1, Ordering::Release);

        Ok(())
    }

    fn contains(&self, type_info: &TypeInfo) -> bool {
        self.providers.read().contains_key(type_info)
    }

    /// Finds the provider of the injection type in this layer or the nearest ancestor,
    /// together with the layer that owns it.
    pub(crate) fn lookup(self: &Arc<Self>, type_info: &TypeInfo) -> Option<(Arc<Self>, Provider)> {
        let mut registry = self;
        loop {
            if let Some(provider) = registry.providers.read().get(type_info) {
                return Some((registry.clone(), provider.clone()));
            }
            registry = registry.parent.as_ref()?;
        }
    }

    /// Snapshot of the providers held by this layer only.
    pub(crate) fn providers(&self) -> BTreeMap<TypeInfo, Provider> {
        self.providers.read().clone()
    }
}
