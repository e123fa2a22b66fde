use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::*;
use crate::generate::{GeneratorConfig, generate_tree};

fn laid_out(rows: &[Vec<u32>]) -> Tree {
    let mut tree = Tree::from_relations(rows).unwrap();
    layout_tree(&mut tree, &LayoutConfig::default());
    tree
}

fn pos(tree: &Tree, name: &str) -> f64 {
    tree.position_of(name).unwrap().to_f64()
}

/// Strict-descendant extremes of every node, computed directly.
fn descendant_extents(tree: &Tree) -> Vec<Option<(Coord, Coord)>> {
    let mut ext: Vec<Option<(Coord, Coord)>> = vec![None; tree.len()];
    for nid in tree.post_order() {
        let mut acc: Option<(Coord, Coord)> = None;
        for &c in tree.children(nid) {
            let p = tree.node(c).position;
            let (mut lo, mut hi) = (p, p);
            if let Some((clo, chi)) = ext[c.0] {
                lo = lo.min(clo);
                hi = hi.max(chi);
            }
            acc = Some(match acc {
                Some((alo, ahi)) => (alo.min(lo), ahi.max(hi)),
                None => (lo, hi),
            });
        }
        ext[nid.0] = acc;
    }
    ext
}

fn assert_centered(tree: &Tree) {
    for (node, ext) in tree.nodes.iter().zip(descendant_extents(tree)) {
        let Some((lo, hi)) = ext else { continue };
        // Halving may drop one raw unit.
        let off = (2 * node.position.raw() - (lo.raw() + hi.raw())).abs();
        assert!(
            off <= 1,
            "#{} at {} is not centered over [{}, {}]",
            node.name,
            node.position,
            lo,
            hi
        );
    }
}

fn assert_separated(tree: &Tree, min_distance: Coord) {
    let mut rails: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for nid in tree.pre_order() {
        rails.entry(tree.node(nid).depth).or_default().push(nid);
    }
    for (depth, rail) in rails {
        for pair in rail.windows(2) {
            let (a, b) = (tree.node(pair[0]), tree.node(pair[1]));
            assert!(
                b.position - a.position >= min_distance,
                "depth {}: #{} at {} and #{} at {} are too close",
                depth,
                a.name,
                a.position,
                b.name,
                b.position
            );
        }
    }
}

fn assert_normalized(tree: &Tree) {
    let min = tree.nodes.iter().map(|n| n.position).min().unwrap();
    assert_eq!(min, Coord::ZERO);
}

#[test]
fn test_small_tree_positions() {
    let tree = laid_out(&[vec![1, 2, 3, 4], vec![2, 5], vec![3, 6, 7]]);
    assert_eq!(pos(&tree, "1"), 1.25);
    assert_eq!(pos(&tree, "2"), 0.0);
    assert_eq!(pos(&tree, "3"), 1.5);
    assert_eq!(pos(&tree, "4"), 2.5);
    assert_eq!(pos(&tree, "5"), 0.0);
    assert_eq!(pos(&tree, "6"), 1.0);
    assert_eq!(pos(&tree, "7"), 2.0);
}

#[test]
fn test_star() {
    let tree = laid_out(&[vec![1, 2, 3, 4, 5, 6]]);
    assert_eq!(pos(&tree, "1"), 2.0);
    for (i, name) in ["2", "3", "4", "5", "6"].iter().enumerate() {
        assert_eq!(pos(&tree, name), i as f64);
    }
}

#[test]
fn test_leaf_next_to_deep_chain() {
    // The leaf runs out first and is threaded into the chain.
    let tree = laid_out(&[vec![1, 2, 3], vec![3, 4], vec![4, 5]]);
    assert_eq!(pos(&tree, "1"), 0.5);
    assert_eq!(pos(&tree, "2"), 0.0);
    assert_eq!(pos(&tree, "3"), 1.0);
    assert_eq!(pos(&tree, "4"), 1.0);
    assert_eq!(pos(&tree, "5"), 1.0);
}

#[test]
fn test_single_child_sits_under_parent() {
    let tree = laid_out(&[vec![1, 2], vec![2, 3, 4]]);
    assert_eq!(pos(&tree, "1"), pos(&tree, "2"));
    assert_eq!(pos(&tree, "2"), 0.5);
}

#[test]
fn test_root_only() {
    let mut tree = Tree::from_relations(&[vec![1]]).unwrap();
    let summary = layout_tree(&mut tree, &LayoutConfig::default());
    assert_eq!(tree.node(tree.root).position, Coord::ZERO);
    assert_eq!(summary, LayoutSummary { nodes: 1, width: Coord::ZERO, depth: 0 });
}

#[test]
fn test_custom_min_distance() {
    let mut tree = Tree::from_relations(&[vec![1, 2, 3, 4]]).unwrap();
    let summary = layout_tree(&mut tree, &LayoutConfig { min_distance: 2.0 });
    assert_eq!(pos(&tree, "2"), 0.0);
    assert_eq!(pos(&tree, "3"), 2.0);
    assert_eq!(pos(&tree, "4"), 4.0);
    assert_eq!(pos(&tree, "1"), 2.0);
    assert_eq!(summary.width, Coord::from_int(4));
}

#[test]
fn test_non_positive_min_distance_is_clamped() {
    let cfg = LayoutConfig { min_distance: -3.0 };
    assert_eq!(cfg.min_distance(), Coord::EPSILON);
    let mut tree = Tree::from_relations(&[vec![1, 2, 3]]).unwrap();
    layout_tree(&mut tree, &cfg);
    assert!(tree.position_of("3").unwrap() > tree.position_of("2").unwrap());
}

#[test]
fn test_min_distance_must_be_finite_and_bounded() {
    assert!(LayoutConfig::default().validate().is_ok());
    assert!(LayoutConfig { min_distance: -3.0 }.validate().is_ok());
    assert!(LayoutConfig { min_distance: LayoutConfig::MAX_MIN_DISTANCE }.validate().is_ok());

    let max = Coord::from_f64(LayoutConfig::MAX_MIN_DISTANCE);
    for (d, used) in [
        (f64::NAN, Coord::from_int(1)),
        (f64::INFINITY, max),
        (f64::NEG_INFINITY, Coord::EPSILON),
        (1e15, max),
    ] {
        let cfg = LayoutConfig { min_distance: d };
        assert!(cfg.validate().is_err(), "{} accepted", d);
        assert_eq!(cfg.min_distance(), used, "{}", d);

        // Unvalidated configs still lay out without overflow.
        let mut tree = Tree::from_relations(&[vec![1, 2, 3], vec![2, 4, 5], vec![3, 6]]).unwrap();
        layout_tree(&mut tree, &cfg);
        assert_separated(&tree, used);
        assert_normalized(&tree);
        assert_centered(&tree);
    }
}

#[test]
fn test_long_caterpillar_lays_out_in_linear_time() {
    // A spine of right children, each spine node also carrying a leaf.
    let spine = 50_000u32;
    let rows: Vec<Vec<u32>> = (1..=spine).map(|n| vec![2 * n - 1, 2 * n, 2 * n + 1]).collect();
    let mut tree = Tree::from_relations(&rows).unwrap();

    let start = Instant::now();
    let summary = layout_tree(&mut tree, &LayoutConfig::default());
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_secs(5), "{} nodes took {:?}", tree.len(), elapsed);

    assert_eq!(summary.nodes, 2 * spine as usize + 1);
    assert_eq!(summary.depth, spine as usize);
    assert_separated(&tree, Coord::from_int(1));
    assert_normalized(&tree);
    assert_centered(&tree);
}

#[test]
fn test_inner_small_subtree_is_centered_between_big_ones() {
    // 3 is a leaf between two wide subtrees that collide below it.
    let tree = laid_out(&[
        vec![1, 2, 3, 4],
        vec![2, 5, 6],
        vec![4, 7, 8],
        vec![6, 9, 10],
        vec![7, 11, 12],
    ]);
    let (a, b, c) = (pos(&tree, "2"), pos(&tree, "3"), pos(&tree, "4"));
    assert!((b - a - (c - b)).abs() < 1e-4, "{} {} {}", a, b, c);
    assert_separated(&tree, Coord::from_int(1));
    assert_centered(&tree);
}

#[test]
fn test_same_subtree_same_shape_anywhere() {
    let shape = |base: u32| {
        vec![
            vec![base, base + 1, base + 2, base + 3],
            vec![base + 1, base + 4],
            vec![base + 3, base + 5, base + 6],
            vec![base + 5, base + 7, base + 8, base + 9],
        ]
    };

    let alone = laid_out(&shape(100));

    let mut rows = vec![vec![1, 2, 100, 3], vec![2, 4, 5], vec![3, 6], vec![6, 7, 8]];
    rows.extend(shape(100));
    let embedded = laid_out(&rows);

    let relative = |t: &Tree, name: &str| pos(t, name) - pos(t, "100");
    for n in 100..=109 {
        let name = n.to_string();
        assert_eq!(relative(&alone, &name), relative(&embedded, &name), "#{}", name);
    }
}

#[test]
fn test_layout_is_repeatable() {
    let cfg = GeneratorConfig { size: 120, ..GeneratorConfig::default() };
    let mut tree = generate_tree(&cfg, 11).unwrap();
    let first = layout_tree(&mut tree, &LayoutConfig::default());
    let before: Vec<Coord> = tree.nodes.iter().map(|n| n.position).collect();
    let second = layout_tree(&mut tree, &LayoutConfig::default());
    let after: Vec<Coord> = tree.nodes.iter().map(|n| n.position).collect();
    assert_eq!(first, second);
    assert_eq!(before, after);
}

#[test]
fn test_threads_are_consumed() {
    let tree = Tree::from_relations(&[vec![1, 2, 3, 4], vec![2, 5], vec![4, 6], vec![6, 7]]).unwrap();
    let mut layouter = Layouter::new(&tree, Coord::from_int(1));
    layouter.relative_pass();
    assert!(!layouter.threads.is_empty());
    let shift = -layouter.left_contour_min();
    layouter.petrify(shift);
    assert!(layouter.threads.is_empty());
}

#[test]
fn test_summary() {
    let mut tree = Tree::from_relations(&[vec![1, 2, 3, 4], vec![2, 5], vec![3, 6, 7]]).unwrap();
    let summary = layout_tree(&mut tree, &LayoutConfig::default());
    assert_eq!(summary.nodes, 7);
    assert_eq!(summary.width, Coord::from_f64(2.5));
    assert_eq!(summary.depth, 2);
}

#[test]
fn test_wide_and_deep_chain() {
    // A long chain hanging off the last of many leaves.
    let mut rows = vec![(1..=12).collect::<Vec<u32>>()];
    for n in 12..40 {
        rows.push(vec![n, n + 1]);
    }
    let tree = laid_out(&rows);
    assert_normalized(&tree);
    assert_separated(&tree, Coord::from_int(1));
    assert_centered(&tree);
    assert_eq!(pos(&tree, "40"), pos(&tree, "12"));
}

#[test]
fn test_random_trees_hold_layout_properties() {
    let configs = [
        GeneratorConfig::default(),
        GeneratorConfig { size: 200, min_children: 0, max_children: 3 },
        GeneratorConfig { size: 150, min_children: 1, max_children: 8 },
        GeneratorConfig { size: 60, min_children: 1, max_children: 2 },
    ];
    for cfg in &configs {
        for seed in 0..40 {
            let mut tree = generate_tree(cfg, seed).unwrap();
            layout_tree(&mut tree, &LayoutConfig::default());
            assert_normalized(&tree);
            assert_separated(&tree, Coord::from_int(1));
            assert_centered(&tree);
        }
    }
}

#[test]
fn test_random_trees_fractional_distance() {
    let layout_cfg = LayoutConfig { min_distance: 0.7 };
    let cfg = GeneratorConfig { size: 100, ..GeneratorConfig::default() };
    for seed in 100..120 {
        let mut tree = generate_tree(&cfg, seed).unwrap();
        layout_tree(&mut tree, &layout_cfg);
        assert_normalized(&tree);
        assert_separated(&tree, layout_cfg.min_distance());
        assert_centered(&tree);
    }
}
