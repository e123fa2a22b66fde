//! Plain-text dumps of a laid-out tree, for the CLI and for eyeballing
//! layouts in tests.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::tree::{NodeId, Tree};

/// Nodes landing on the same grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub depth: usize,
    pub column: i64,
    pub nodes: Vec<String>,
}

/// Node ids per depth, left to right.
fn rails(tree: &Tree) -> BTreeMap<usize, Vec<NodeId>> {
    let mut rails: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for nid in tree.pre_order() {
        rails.entry(tree.node(nid).depth).or_default().push(nid);
    }
    rails
}

/// One line per depth: `depth 1: #2 at 0, #3 at 1.50`.
pub fn render_positions(tree: &Tree) -> String {
    let mut out = String::new();
    for (depth, rail) in rails(tree) {
        let cells: Vec<String> = rail
            .iter()
            .map(|&n| format!("#{} at {}", tree.node(n).name, tree.node(n).position))
            .collect();
        let _ = writeln!(out, "depth {}: {}", depth, cells.join(", "));
    }
    out
}

/// Parent-children lines in pre-order: `1 -> 2, 3`.
pub fn render_edges(tree: &Tree) -> String {
    let mut out = String::new();
    for nid in tree.pre_order() {
        let children = tree.children(nid);
        if children.is_empty() {
            continue;
        }
        let names: Vec<&str> = children.iter().map(|&c| tree.node(c).name.as_str()).collect();
        let _ = writeln!(out, "{} -> {}", tree.node(nid).name, names.join(", "));
    }
    out
}

/// Cells holding more than one node once positions are rounded.
pub fn find_collisions(tree: &Tree) -> Vec<Collision> {
    let mut cells: BTreeMap<(usize, i64), Vec<String>> = BTreeMap::new();
    for nid in tree.pre_order() {
        let n = tree.node(nid);
        cells.entry((n.depth, n.position.round())).or_default().push(n.name.clone());
    }
    cells
        .into_iter()
        .filter(|(_, nodes)| nodes.len() > 1)
        .map(|((depth, column), nodes)| Collision { depth, column, nodes })
        .collect()
}

/// Widest grid `render_grid` will draw.
pub const MAX_GRID_COLUMNS: usize = 4096;

/// ASCII grid, one row per depth, names right-aligned in `cell_width`
/// columns. Names longer than a cell are cut from the left. Collisions show
/// the first node and are listed after the grid. Trees wider than
/// [`MAX_GRID_COLUMNS`] get a one-line notice instead of rows.
pub fn render_grid(tree: &Tree, cell_width: usize) -> String {
    let cell_width = cell_width.max(1);
    let widest = tree.nodes.iter().map(|n| n.position.round()).max().unwrap_or(0).max(0);
    let columns = usize::try_from(widest).unwrap_or(usize::MAX).saturating_add(1);

    let mut out = String::new();
    if columns > MAX_GRID_COLUMNS {
        let _ = writeln!(out, "grid omitted: {} columns exceed the limit of {}", columns, MAX_GRID_COLUMNS);
        write_collisions(tree, &mut out);
        return out;
    }
    for (_, rail) in rails(tree) {
        let mut row = vec![String::new(); columns];
        for &nid in &rail {
            let n = tree.node(nid);
            let col = n.position.round().max(0) as usize;
            if row[col].is_empty() {
                row[col] = n.name.clone();
            }
        }
        let line: String = row
            .iter()
            .map(|name| {
                let shown = name
                    .char_indices()
                    .nth(name.chars().count().saturating_sub(cell_width))
                    .map_or("", |(i, _)| &name[i..]);
                format!("{:>width$}", shown, width = cell_width)
            })
            .collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    write_collisions(tree, &mut out);
    out
}

fn write_collisions(tree: &Tree, out: &mut String) {
    for c in find_collisions(tree) {
        let _ = writeln!(
            out,
            "collision at depth {} column {}: {}",
            c.depth,
            c.column,
            c.nodes.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Coord, LayoutConfig, layout_tree};

    fn sample() -> Tree {
        let mut tree = Tree::from_relations(&[vec![1, 2, 3, 4], vec![2, 5], vec![3, 6, 7]]).unwrap();
        layout_tree(&mut tree, &LayoutConfig::default());
        tree
    }

    #[test]
    fn test_render_positions() {
        let text = render_positions(&sample());
        assert_eq!(
            text,
            "depth 0: #1 at 1.25\ndepth 1: #2 at 0, #3 at 1.50, #4 at 2.50\ndepth 2: #5 at 0, #6 at 1, #7 at 2\n"
        );
    }

    #[test]
    fn test_render_edges() {
        assert_eq!(render_edges(&sample()), "1 -> 2, 3, 4\n2 -> 5\n3 -> 6, 7\n");
    }

    #[test]
    fn test_grid_reports_rounding_collisions() {
        // 3 at 1.5 and 4 at 2.5 round to columns 2 and 3; no clash.
        let tree = sample();
        assert!(find_collisions(&tree).is_empty());

        let grid = render_grid(&tree, 3);
        let rows: Vec<&str> = grid.lines().collect();
        assert_eq!(rows, ["     1", "  2     3  4", "  5  6  7"]);
    }

    #[test]
    fn test_forced_collision() {
        let mut tree = Tree::from_relations(&[vec![1, 2, 3]]).unwrap();
        tree.nodes[1].position = Coord::from_f64(0.4);
        tree.nodes[2].position = Coord::from_f64(0.2);
        let collisions = find_collisions(&tree);
        assert_eq!(
            collisions,
            vec![Collision { depth: 1, column: 0, nodes: vec!["2".into(), "3".into()] }]
        );
        assert!(render_grid(&tree, 2).ends_with("collision at depth 1 column 0: 2, 3\n"));
    }

    #[test]
    fn test_long_names_are_cut() {
        let mut tree = Tree::from_relations(&[vec![1, 22222]]).unwrap();
        layout_tree(&mut tree, &LayoutConfig::default());
        assert_eq!(render_grid(&tree, 3).lines().nth(1), Some("222"));
    }

    #[test]
    fn test_wide_grid_is_not_drawn() {
        let mut tree = Tree::from_relations(&[vec![1, 2, 3], vec![2, 4]]).unwrap();
        tree.nodes[1].position = Coord::from_int(1_000_000_000);
        tree.nodes[2].position = Coord::from_int(1_000_000_000);
        let grid = render_grid(&tree, 4);
        assert_eq!(
            grid,
            "grid omitted: 1000000001 columns exceed the limit of 4096\ncollision at depth 1 column 1000000000: 2, 3\n"
        );
    }
}
