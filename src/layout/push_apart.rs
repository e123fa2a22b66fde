// Push-apart: keep neighboring subtrees at least `min_distance` apart.
//
// `gaps[i]` is the distance from child i-1 to child i (gaps[0] is unused and
// stays 0). For a pair of live neighbors (l, r) with inactive children in
// between, the shortfall is spread evenly over gaps l+1..=r so the small
// subtrees in the middle are centered in the free space instead of being
// stacked against one side.

use log::trace;

use super::contour::ContourWalker;
use super::unit::Coord;

/// Separate every adjacent pair in `survivors`. Returns how many pairs moved.
pub fn push_apart(
    walker: &ContourWalker,
    survivors: &[usize],
    gaps: &mut [Coord],
    min_distance: Coord,
) -> usize {
    let mut moved = 0;
    for pair in survivors.windows(2) {
        let (l, r) = (pair[0], pair[1]);
        let distance: Coord = gaps[l + 1..=r].iter().sum();
        let gap = distance + walker.left[r].offset - walker.right[l].offset;
        if gap >= min_distance {
            continue;
        }
        let shortfall = min_distance - gap;
        spread(&mut gaps[l + 1..=r], shortfall);
        trace!("    push apart [{}] and [{}] by {}", l, r, shortfall);
        moved += 1;
    }
    moved
}

/// Add `amount` to `gaps` in equal shares; the indivisible remainder goes to
/// the last gap so the total is exact.
fn spread(gaps: &mut [Coord], amount: Coord) {
    let (share, remainder) = amount.split(gaps.len());
    for g in gaps.iter_mut() {
        *g += share;
    }
    if let Some(last) = gaps.last_mut() {
        *last += remainder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    fn walker_for(n: usize) -> (Tree, ContourWalker) {
        let row: Vec<u32> = (1..=n as u32 + 1).collect();
        let tree = Tree::from_relations(&[row]).unwrap();
        let walker = ContourWalker::new(tree.children(tree.root));
        (tree, walker)
    }

    #[test]
    fn test_adjacent_pair_gets_full_shortfall() {
        let (_tree, mut walker) = walker_for(2);
        walker.right[0].offset = Coord::from_f64(0.5);
        walker.left[1].offset = Coord::from_f64(-0.5);
        let mut gaps = vec![Coord::ZERO, Coord::from_int(1)];

        let moved = push_apart(&walker, &[0, 1], &mut gaps, Coord::from_int(1));
        assert_eq!(moved, 1);
        assert_eq!(gaps[1], Coord::from_int(2));
    }

    #[test]
    fn test_shortfall_is_spread_over_middle_children() {
        let (_tree, mut walker) = walker_for(3);
        walker.right[0].offset = Coord::from_int(1);
        walker.left[2].offset = Coord::from_int(-1);
        let mut gaps = vec![Coord::ZERO, Coord::from_int(1), Coord::from_int(1)];

        // distance 2 + (-1) - 1 = 0, needs 1 more, split over both gaps.
        push_apart(&walker, &[0, 2], &mut gaps, Coord::from_int(1));
        assert_eq!(gaps[1], Coord::from_f64(1.5));
        assert_eq!(gaps[2], Coord::from_f64(1.5));
    }

    #[test]
    fn test_remainder_lands_on_last_gap() {
        let mut gaps = vec![Coord::ZERO; 3];
        spread(&mut gaps, Coord::from_raw(7));
        assert_eq!(gaps, vec![Coord::from_raw(2), Coord::from_raw(2), Coord::from_raw(3)]);
    }

    #[test]
    fn test_far_enough_pair_untouched() {
        let (_tree, walker) = walker_for(2);
        let mut gaps = vec![Coord::ZERO, Coord::from_int(3)];
        assert_eq!(push_apart(&walker, &[0, 1], &mut gaps, Coord::from_int(1)), 0);
        assert_eq!(gaps[1], Coord::from_int(3));
    }
}
