use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::{
    any::TypeInfo,
    errors::ValidateErrorKind,
    instantiator::Signature,
    registry::{Provider, Registry},
};

/// Entry of one layer: the injection type and the depth of the layer,
/// `0` for the layer the graph is built from.
type Vertex = (TypeInfo, usize);

/// Snapshot of the entries of a layer and of its ancestors.
///
/// An injection type held by several layers has one vertex per layer,
/// since a parent constructor resolves its inputs from its own layer upward.
#[derive(Default)]
pub(crate) struct Graph {
    vertices: BTreeMap<Vertex, Option<Signature>>,
}

impl Graph {
    fn new(registry: &Registry) -> Self {
        let mut vertices = BTreeMap::new();
        for (depth, layer) in registry.layers().enumerate() {
            for (type_info, provider) in layer.providers() {
                let signature = match provider {
                    Provider::Value(_) => None,
                    Provider::Node(node) => Some(node.constructor.signature.clone()),
                };
                vertices.insert((type_info, depth), signature);
            }
        }
        Self { vertices }
    }

    /// Vertex an input of a constructor at `depth` resolves to: the nearest layer holding it,
    /// starting from the constructor's own layer.
    fn resolve(&self, type_info: &TypeInfo, depth: usize) -> Option<Vertex> {
        self.vertices
            .range((*type_info, depth)..=(*type_info, usize::MAX))
            .next()
            .map(|(vertex, _)| *vertex)
    }

    fn check_missing(&self) -> Result<(), ValidateErrorKind> {
        for (&(_, depth), signature) in &self.vertices {
            let Some(signature) = signature else {
                continue;
            };
            for (position, type_info) in signature.dependencies.iter().enumerate() {
                if self.resolve(type_info, depth).is_none() {
                    return Err(ValidateErrorKind::Missing {
                        signature: signature.clone(),
                        position,
                        type_info: *type_info,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_cycles(&self, roots: impl IntoIterator<Item = Vertex>) -> Result<(), ValidateErrorKind> {
        let mut finished = BTreeSet::new();
        let mut stack = Vec::new();
        for root in roots {
            self.visit(root, &mut stack, &mut finished)?;
        }
        Ok(())
    }

    fn visit(&self, vertex: Vertex, stack: &mut Vec<Vertex>, finished: &mut BTreeSet<Vertex>) -> Result<(), ValidateErrorKind> {
        if let Some(start) = stack.iter().position(|on_stack| *on_stack == vertex) {
            let path = stack[start..]
                .iter()
                .chain([&vertex])
                .map(|(type_info, _)| *type_info)
                .collect::<Vec<_>>();
            return Err(ValidateErrorKind::Cycle { path: path.into() });
        }
        if finished.contains(&vertex) {
            return Ok(());
        }
        let Some(Some(signature)) = self.vertices.get(&vertex) else {
            finished.insert(vertex);
            return Ok(());
        };

        let (_, depth) = vertex;
        stack.push(vertex);
        for dependency in signature.dependencies.iter() {
            if let Some(next) = self.resolve(dependency, depth) {
                self.visit(next, stack, finished)?;
            }
        }
        stack.pop();
        finished.insert(vertex);

        Ok(())
    }
}

/// Cycle verdicts of one layer, valid while no layer of its chain registers anything.
#[derive(Clone, Default)]
pub(crate) struct CycleCache {
    generations: Vec<u64>,
    graph: Arc<Graph>,
    verdicts: BTreeMap<TypeInfo, Result<(), ValidateErrorKind>>,
}

/// Checks, without constructing anything, that every constructor input has an entry
/// and that the graph has no cycle.
///
/// Constructors are visited in injection type order and inputs in declared order,
/// so the reported error is the same whatever the registration order.
/// A missing input is reported before any cycle.
///
/// # Errors
/// Returns [`ValidateErrorKind::Missing`] for the first unsatisfied input, otherwise
/// [`ValidateErrorKind::Cycle`] for the first cycle found.
pub(crate) fn validate(registry: &Registry) -> Result<(), ValidateErrorKind> {
    let graph = Graph::new(registry);
    graph.check_missing()?;
    graph.check_cycles(graph.vertices.keys().copied())
}

/// Searches for a cycle reachable from an injection type registered in `registry`.
/// Missing inputs are ignored.
///
/// The graph and the verdict are cached in the layer and rebuilt only after a registration
/// in the layer or one of its ancestors.
pub(crate) fn detect_cycle_from(registry: &Registry, type_info: &TypeInfo) -> Result<(), ValidateErrorKind> {
    let generations = registry.generations();
    let mut cache = registry.cycles.lock();
    if cache.generations != generations {
        *cache = CycleCache {
            generations,
            graph: Arc::new(Graph::new(registry)),
            verdicts: BTreeMap::new(),
        };
    }

    if let Some(verdict) = cache.verdicts.get(type_info) {
        return verdict.clone();
    }
    let verdict = cache.graph.check_cycles([(*type_info, 0)]);
    cache.verdicts.insert(*type_info, verdict.clone());
    verdict
}
