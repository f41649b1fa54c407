//! Property-based tests for board rules and tree invariants.

use std::time::Duration;

use knight_tour::core::{Board, Position, TourRng, KNIGHT_MOVES};
use knight_tour::mcts::{DepthRatio, KnightSearch, NodeId, SearchConfig, TimeBudget, Uct};
use proptest::prelude::*;

fn position(max: u8) -> impl Strategy<Value = Position> {
    (0..max, 0..max).prop_map(|(x, y)| Position::new(x, y))
}

fn board_and_ancestry() -> impl Strategy<Value = (Board, Vec<Position>)> {
    (1u8..=8).prop_flat_map(|n| {
        (
            Just(Board::new(i64::from(n)).unwrap()),
            prop::collection::vec(position(n), 1..12),
        )
    })
}

proptest! {
    #[test]
    fn test_valid_move_matches_definition(
        (board, ancestry) in board_and_ancestry(),
        x in -3i16..12,
        y in -3i16..12,
    ) {
        let n = i16::from(board.size());
        let expected = (0..n).contains(&x)
            && (0..n).contains(&y)
            && !ancestry.iter().any(|p| i16::from(p.x) == x && i16::from(p.y) == y);

        prop_assert_eq!(board.is_valid_move(ancestry.iter().copied(), x, y), expected);
    }

    #[test]
    fn test_successors_are_fresh_knight_moves((board, ancestry) in board_and_ancestry()) {
        let head = ancestry[0];
        let successors = board.successors(ancestry.iter().copied());

        prop_assert!(successors.len() <= KNIGHT_MOVES.len());
        for next in &successors {
            prop_assert!(head.knight_offset_to(*next).is_some());
            prop_assert!(!ancestry.contains(next));
        }
    }

    #[test]
    fn test_unvisited_child_always_wins(
        parent_visits in 0u32..10_000,
        child_visits in 1u32..10_000,
        value in 0.0f64..10_000.0,
        c in 0.0f64..10.0,
    ) {
        let visited = Uct::score(parent_visits, child_visits, value, c);

        prop_assert!(visited.is_finite());
        prop_assert!(Uct::score(parent_visits, 0, 0.0, c) > visited);
    }

    #[test]
    fn test_time_budget_from_minutes(minutes in -10_000i64..10_000) {
        let expected = Duration::from_secs(u64::try_from(minutes.max(0)).unwrap() * 60);

        prop_assert_eq!(TimeBudget::from_minutes(minutes).as_duration(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_backprop_touches_only_the_path(
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
        reward in 0.0f64..1.0,
    ) {
        let config = SearchConfig::default()
            .with_time_budget(Duration::from_secs(600))
            .with_max_iterations(60);
        let mut search = KnightSearch::new(Board::new(6).unwrap(), config, DepthRatio, TourRng::new(seed));
        search.run(Vec::new()).unwrap();

        let mut tree = search.tree().clone();
        let target = NodeId::new(pick.index(tree.len()) as u32);
        let on_path = tree.path_ids(target);
        let before: Vec<(u32, f64)> = tree.iter().map(|(_, n)| (n.visits, n.total_value)).collect();

        tree.backpropagate(target, reward);

        for (id, node) in tree.iter() {
            let (visits, value) = before[id.raw() as usize];
            if on_path.contains(&id) {
                prop_assert_eq!(node.visits, visits + 1);
                prop_assert!((node.total_value - (value + reward)).abs() < 1e-9);
            } else {
                prop_assert_eq!(node.visits, visits);
                prop_assert_eq!(node.total_value, value);
            }
        }
    }
}
