//! Policy Graph
//!
//! Discount nodes reference their nested nodes by id, so a store's policy is a
//! directed graph of ids. Evaluation only ever looks one level down and never
//! loops, but a cyclic configuration is almost certainly a data error, so it
//! can be detected and reported here.

use petgraph::{
    algo::{is_cyclic_directed, tarjan_scc},
    graph::{DiGraph, NodeIndex},
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{DiscountRepository, PolicyRepository},
    discounts::DiscountNode,
    ids::{DiscountId, StoreId},
    pricing::{PolicySnapshot, PricingError},
};

/// Errors raised when validating a policy graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyGraphError {
    /// The nested-discount references form a cycle.
    #[error("discount graph contains a cycle through: {}", join_ids(.0))]
    CycleDetected(Vec<DiscountId>),
}

fn join_ids(ids: &[DiscountId]) -> String {
    ids.iter()
        .map(DiscountId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A nested reference that did not resolve to a known node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// The node holding the reference
    pub parent: DiscountId,

    /// The unresolved nested id
    pub missing: DiscountId,
}

/// Directed graph of discount ids, with an edge from each node to each of its
/// resolved nested nodes.
#[derive(Debug, Default)]
pub struct PolicyGraph {
    graph: DiGraph<DiscountId, ()>,
    indices: FxHashMap<DiscountId, NodeIndex>,
    dangling: SmallVec<[DanglingReference; 4]>,
}

impl PolicyGraph {
    /// Build a graph from a set of discount nodes.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a DiscountNode>) -> Self {
        let nodes: SmallVec<[&DiscountNode; 16]> = nodes.into_iter().collect();
        let mut policy = Self::default();

        for node in &nodes {
            if !policy.indices.contains_key(&node.id) {
                let index = policy.graph.add_node(node.id.clone());
                policy.indices.insert(node.id.clone(), index);
            }
        }

        for node in &nodes {
            let Some(&parent) = policy.indices.get(&node.id) else {
                continue;
            };

            for nested in &node.nested_ids {
                if let Some(&child) = policy.indices.get(nested) {
                    policy.graph.update_edge(parent, child, ());
                } else {
                    policy.dangling.push(DanglingReference {
                        parent: node.id.clone(),
                        missing: nested.clone(),
                    });
                }
            }
        }

        policy
    }

    /// Build the graph of every node a store's policy can reach.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::StoreNotFound`] if the store has no policy.
    pub fn from_repository<R>(repository: &R, store: &StoreId) -> Result<Self, PricingError>
    where
        R: PolicyRepository + DiscountRepository + ?Sized,
    {
        Ok(PolicySnapshot::load(repository, store)?.graph())
    }

    /// Number of discount nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether any chain of nested references leads back to where it started.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Nested references that did not resolve.
    pub fn dangling(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// Ids of nodes that take part in a cycle, sorted.
    pub fn cyclic_nodes(&self) -> Vec<DiscountId> {
        let mut ids: Vec<DiscountId> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .flatten()
            .filter_map(|index| self.graph.node_weight(index).cloned())
            .collect();

        ids.sort();
        ids
    }

    /// Check that the graph is acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyGraphError::CycleDetected`] listing the nodes on a cycle.
    pub fn validate(&self) -> Result<(), PolicyGraphError> {
        if self.is_cyclic() {
            return Err(PolicyGraphError::CycleDetected(self.cyclic_nodes()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::InMemoryCatalog;

    use super::*;

    fn node(id: &str, nested: &[&str]) -> DiscountNode {
        DiscountNode::new(id, "s1", 0.1).with_nested(nested.iter().copied())
    }

    #[test]
    fn acyclic_graph_validates() {
        let nodes = [node("a", &["b", "c"]), node("b", &["c"]), node("c", &[])];
        let graph = PolicyGraph::from_nodes(&nodes);

        assert_eq!(graph.node_count(), 3, "three nodes");
        assert!(!graph.is_cyclic(), "acyclic");
        assert_eq!(graph.validate(), Ok(()), "validates");
    }

    #[test]
    fn cycle_is_reported_with_members() {
        let nodes = [node("a", &["b"]), node("b", &["a"]), node("c", &["a"])];
        let graph = PolicyGraph::from_nodes(&nodes);

        assert_eq!(
            graph.validate(),
            Err(PolicyGraphError::CycleDetected(vec![
                DiscountId::from("a"),
                DiscountId::from("b")
            ])),
            "a <-> b"
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let nodes = [node("a", &["a"]), node("b", &[])];
        let graph = PolicyGraph::from_nodes(&nodes);

        assert!(graph.is_cyclic(), "self loop");
        assert_eq!(graph.cyclic_nodes(), vec![DiscountId::from("a")], "only a");
    }

    #[test]
    fn dangling_references_are_collected() {
        let nodes = [node("a", &["missing", "b"]), node("b", &[])];
        let graph = PolicyGraph::from_nodes(&nodes);

        assert_eq!(
            graph.dangling(),
            &[DanglingReference {
                parent: DiscountId::from("a"),
                missing: DiscountId::from("missing"),
            }],
            "one dangling id"
        );
    }

    #[test]
    fn from_repository_covers_reachable_nodes_only() -> TestResult {
        let mut catalog = InMemoryCatalog::new();

        for discount in [
            node("a", &["b"]),
            node("b", &["a", "ghost"]),
            node("elsewhere", &[]),
        ] {
            catalog.insert_discount(discount)?;
        }

        catalog.insert_policy("s1", [DiscountId::from("a")])?;

        let graph = PolicyGraph::from_repository(&catalog, &StoreId::from("s1"))?;

        assert_eq!(graph.node_count(), 2, "a and b");
        assert_eq!(
            graph.cyclic_nodes(),
            vec![DiscountId::from("a"), DiscountId::from("b")],
            "a <-> b"
        );
        assert_eq!(graph.dangling().len(), 1, "ghost");

        assert_eq!(
            PolicyGraph::from_repository(&catalog, &StoreId::from("s2")).map(|graph| graph.node_count()),
            Err(PricingError::StoreNotFound(StoreId::from("s2"))),
            "unknown store"
        );

        Ok(())
    }
}
