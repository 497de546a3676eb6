use std::collections::HashSet;

use crate::game::Position;

/// Cells a planning pass must route around: the whole body plus every wall
///
/// Rebuilt on each call since the body moves every tick. The goal exemption
/// is applied by the search, not here.
pub fn blocked_cells<'a>(
    body: impl IntoIterator<Item = &'a Position>,
    obstacles: &HashSet<Position>,
) -> HashSet<Position> {
    let mut blocked = obstacles.clone();
    blocked.extend(body.into_iter().copied());
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_body_and_walls() {
        let body = vec![Position::new(2, 2), Position::new(1, 2)];
        let walls = HashSet::from([Position::new(0, 0), Position::new(2, 2)]);

        let blocked = blocked_cells(&body, &walls);
        assert_eq!(
            blocked,
            HashSet::from([Position::new(0, 0), Position::new(1, 2), Position::new(2, 2)])
        );
    }

    #[test]
    fn test_empty_inputs() {
        let body: Vec<Position> = Vec::new();
        assert!(blocked_cells(&body, &HashSet::new()).is_empty());
    }
}
