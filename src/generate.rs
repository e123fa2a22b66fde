//! Random tree generation for demos and property tests.
//!
//! Trees are grown breadth-first: each dequeued parent receives a random
//! number of children until the requested size is reached. Nodes are named
//! `1..=size` in creation order, so the root is always `1`.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::tree::{Tree, TreeBuilder, TreeError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Total number of nodes.
    pub size: usize,
    /// Fewest children a dequeued parent receives.
    pub min_children: usize,
    /// Most children a dequeued parent receives.
    pub max_children: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { size: 50, min_children: 1, max_children: 5 }
    }
}

/// Deterministic random tree for `seed`.
pub fn generate_tree(cfg: &GeneratorConfig, seed: u64) -> Result<Tree, TreeError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let size = cfg.size.max(1);
    let max_children = cfg.max_children.max(1);
    let min_children = cfg.min_children.min(max_children);

    let mut builder = TreeBuilder::new();
    let root = builder.node("1");
    let mut count = 1;
    let mut queue = VecDeque::from([root]);

    while count < size {
        let Some(parent) = queue.pop_front() else {
            break;
        };
        let wanted = rng.gen_range(min_children..=max_children);
        for _ in 0..wanted.min(size - count) {
            count += 1;
            let child = builder.node(&count.to_string());
            builder.add_child(parent, child)?;
            queue.push_back(child);
        }
        // Keep growing even if every queued parent drew zero children.
        if queue.is_empty() && count < size {
            queue.push_back(builder.get(&count.to_string()).unwrap_or(root));
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_size() {
        let cfg = GeneratorConfig { size: 80, ..GeneratorConfig::default() };
        let tree = generate_tree(&cfg, 7).unwrap();
        assert_eq!(tree.len(), 80);
        assert_eq!(tree.node(tree.root).name, "1");
    }

    #[test]
    fn test_same_seed_same_tree() {
        let cfg = GeneratorConfig::default();
        let a = generate_tree(&cfg, 42).unwrap();
        let b = generate_tree(&cfg, 42).unwrap();
        let shape = |t: &Tree| t.nodes.iter().map(|n| n.children.clone()).collect::<Vec<_>>();
        assert_eq!(shape(&a), shape(&b));
    }

    #[test]
    fn test_children_bounds() {
        let cfg = GeneratorConfig { size: 200, min_children: 2, max_children: 3 };
        let tree = generate_tree(&cfg, 3).unwrap();
        for node in &tree.nodes {
            assert!(node.children.len() <= 3);
        }
    }

    #[test]
    fn test_zero_children_still_reaches_size() {
        let cfg = GeneratorConfig { size: 30, min_children: 0, max_children: 2 };
        for seed in 0..20 {
            assert_eq!(generate_tree(&cfg, seed).unwrap().len(), 30);
        }
    }

    #[test]
    fn test_single_node() {
        let cfg = GeneratorConfig { size: 1, ..GeneratorConfig::default() };
        let tree = generate_tree(&cfg, 0).unwrap();
        assert_eq!(tree.len(), 1);
    }
}
