//! A* over the 4-connected grid
//!
//! Unit step cost with the Manhattan distance as heuristic, which is
//! consistent on this grid, so the first time the goal is popped its path is
//! shortest. Nodes live in an arena and point at their parent by index. The
//! heap only ever receives new entries: when a cell gets a cheaper node the
//! open map is repointed and the old heap entry is skipped when it surfaces.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use tracing::trace;

use crate::game::{Grid, Position};

/// One expanded or discovered cell in a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchNode {
    f: u32,
    g: u32,
    h: u32,
    position: Position,
    parent: Option<usize>,
}

/// Heap ordering: lowest `f`, then lowest `g`, then column, row and node id
type FrontierKey = Reverse<(u32, u32, i32, i32, usize)>;

fn frontier_key(node: &SearchNode, id: usize) -> FrontierKey {
    Reverse((node.f, node.g, node.position.x, node.position.y, id))
}

/// Everything a search produces
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    /// Cells after `start` up to and including `goal`, or `None` if unreachable
    pub path: Option<Vec<Position>>,
    /// Cells still open when the search stopped
    pub frontier: BTreeSet<Position>,
    /// Cells expanded by the search
    pub visited: BTreeSet<Position>,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Manhattan distance heuristic
pub fn heuristic(a: Position, b: Position) -> u32 {
    a.manhattan(b)
}

/// Shortest path from `start` to `goal` avoiding `blocked`
///
/// `goal` may always be entered even if it appears in `blocked`. `start` is
/// never checked against `blocked`.
pub fn astar(
    grid: &Grid,
    start: Position,
    goal: Position,
    blocked: &HashSet<Position>,
) -> SearchOutcome {
    let mut arena: Vec<SearchNode> = Vec::new();
    let mut heap: BinaryHeap<FrontierKey> = BinaryHeap::new();
    let mut open: HashMap<Position, usize> = HashMap::new();
    let mut visited: BTreeSet<Position> = BTreeSet::new();

    let h0 = heuristic(start, goal);
    arena.push(SearchNode {
        f: h0,
        g: 0,
        h: h0,
        position: start,
        parent: None,
    });
    heap.push(frontier_key(&arena[0], 0));
    open.insert(start, 0);

    let mut stale = 0usize;

    while let Some(Reverse((_, _, _, _, id))) = heap.pop() {
        let current = arena[id];
        if open.get(&current.position) != Some(&id) {
            stale += 1;
            continue;
        }

        if current.position == goal {
            let path = reconstruct_path(&arena, id);
            trace!(
                path_len = path.len(),
                expanded = visited.len(),
                nodes = arena.len(),
                stale,
                "astar reached goal"
            );
            return SearchOutcome {
                path: Some(path),
                frontier: open.into_keys().collect(),
                visited,
            };
        }

        visited.insert(current.position);
        open.remove(&current.position);

        for neighbor in grid.neighbors(current.position) {
            if blocked.contains(&neighbor) && neighbor != goal {
                continue;
            }
            if visited.contains(&neighbor) {
                continue;
            }

            let g = current.g + 1;
            let improves = match open.get(&neighbor) {
                None => true,
                Some(&existing) => g < arena[existing].g,
            };
            if !improves {
                continue;
            }

            let h = heuristic(neighbor, goal);
            let node = SearchNode {
                f: g + h,
                g,
                h,
                position: neighbor,
                parent: Some(id),
            };
            let node_id = arena.len();
            arena.push(node);
            heap.push(frontier_key(&node, node_id));
            open.insert(neighbor, node_id);
        }
    }

    trace!(
        expanded = visited.len(),
        nodes = arena.len(),
        stale,
        "astar exhausted frontier"
    );

    SearchOutcome {
        path: None,
        frontier: open.into_keys().collect(),
        visited,
    }
}

/// Walk parent links back to the root, root excluded, in start-to-goal order
fn reconstruct_path(arena: &[SearchNode], goal_id: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut id = goal_id;
    while let Some(parent) = arena[id].parent {
        debug_assert_eq!(arena[id].g, arena[parent].g + 1);
        debug_assert_eq!(arena[id].f, arena[id].g + arena[id].h);
        path.push(arena[id].position);
        id = parent;
    }
    path.reverse();
    path
}
