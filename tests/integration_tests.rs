mod common;

use common::{
    init_logging, mirror_index, one_move_left, x_has_won, x_wins_at_2, x_wins_at_8, Mark,
    Stubborn, Stuck, TicTacToe,
};
use uct_planner::{plan, plan_with_seed, GameState, MCTSConfig, MCTSError, NodeId, MCTS};

#[test]
fn test_mcts_basic_functionality() {
    init_logging();

    let config = MCTSConfig::default()
        .with_exploration_constant(1.414)
        .with_budget(100)
        .with_seed(1);

    let mut mcts = MCTS::new(TicTacToe::new(), config);

    let action = mcts.search().expect("search should succeed");
    assert!(action < 9, "Action should be a board cell");

    let stats = mcts.get_statistics();
    assert_eq!(stats.iterations, 100);
    assert_eq!(stats.budget, 100);
    assert_eq!(stats.completion(), 1.0);
    assert!(!stats.stopped_early);
    assert!(stats.expansions >= 1);

    let best = mcts.tree().get(NodeId(action + 1)).unwrap();
    assert_eq!(stats.best_value, Some(best.value()));
    assert!(stats.summary().contains("Iterations: 100 of 100"));
    assert!(stats.tree_size > 1, "Tree should have grown");
    assert_eq!(stats.tree_size, mcts.tree().len());
}

#[test]
fn test_finds_immediate_win() {
    init_logging();

    let action = plan_with_seed(x_wins_at_8(), 500, 1.414, 5, 11).unwrap();
    assert_eq!(action, 8, "MCTS should complete the bottom row");

    let action = plan_with_seed(x_wins_at_2(), 500, 1.414, 5, 11).unwrap();
    assert_eq!(action, 2, "MCTS should complete the top row");
}

#[test]
fn test_winning_child_has_perfect_value() {
    let config = MCTSConfig::default().with_budget(500).with_seed(5);
    let mut mcts = MCTS::new(x_wins_at_8(), config);
    mcts.search().unwrap();

    let tree = mcts.tree();
    for &child_id in tree.children_of(tree.root()).unwrap() {
        let child = tree.get(child_id).unwrap();
        assert!(child.visits() > 0, "every root child is tried at least once");
        if child.action == Some(8) {
            assert_eq!(child.value(), 1.0);
            assert_eq!(child.mover, Mark::X);
            assert_eq!(child.player, Mark::O);
        }
    }
}

#[test]
fn test_terminal_initial_state() {
    let config = MCTSConfig::default().with_budget(50).with_seed(2);
    let mut mcts = MCTS::new(x_has_won(), config);

    assert_eq!(mcts.search(), Err(MCTSError::AlreadyTerminal));
    assert_eq!(mcts.tree().len(), 1, "only the root may exist");
    assert_eq!(mcts.tree().root_node().visits(), 0);
}

#[test]
fn test_full_board_is_terminal() {
    let drawn = TicTacToe::from_rows(["XOX", "XOO", "OXX"]);
    assert!(drawn.is_terminal());

    let result = plan(drawn, 10, 1.414, 5);
    assert_eq!(result, Err(MCTSError::AlreadyTerminal));
}

#[test]
fn test_single_legal_action() {
    for budget in [1, 7, 64] {
        let config = MCTSConfig::default().with_budget(budget).with_seed(3);
        let mut mcts = MCTS::new(one_move_left(), config);

        assert_eq!(mcts.search().unwrap(), 8);

        let tree = mcts.tree();
        let children = tree.children_of(tree.root()).unwrap();
        assert_eq!(children.len(), 1);

        let only_child = tree.get(children[0]).unwrap();
        assert_eq!(only_child.visits(), budget as u64);
        assert_eq!(only_child.value(), 0.0, "the game always ends drawn");
    }
}

#[test]
fn test_depth_limit_keeps_frontier_leaves() {
    let budget = 300;
    let config = MCTSConfig::default()
        .with_budget(budget)
        .with_max_depth(1)
        .with_seed(4);
    let mut mcts = MCTS::new(TicTacToe::new(), config);
    mcts.search().unwrap();

    let snapshot = mcts.snapshot();
    assert_eq!(snapshot.len(), 10, "root plus its nine children");
    assert_eq!(snapshot.at_depth(2).count(), 0);

    let mut child_visits = 0;
    for child in snapshot.at_depth(1) {
        assert!(child.children.is_empty());
        assert!(child.visits > 0);
        child_visits += child.visits;
    }
    assert_eq!(child_visits, budget as u64);
}

#[test]
fn test_mirrored_positions_give_mirrored_moves() {
    let original = x_wins_at_2();
    let mirrored = original.mirrored();
    assert_eq!(mirrored, TicTacToe::from_rows([".XX", ".OO", "..."]));

    let action = plan_with_seed(original, 400, 1.414, 5, 21).unwrap();
    let mirrored_action = plan_with_seed(mirrored, 400, 1.414, 5, 21).unwrap();

    assert_eq!(mirror_index(action), mirrored_action);
}

#[test]
fn test_seeded_searches_are_identical() {
    let run = || {
        let config = MCTSConfig::default().with_budget(300).with_seed(99);
        let mut mcts = MCTS::new(TicTacToe::new(), config);
        let action = mcts.search().unwrap();
        (action, mcts.snapshot())
    };

    let (first_action, first_tree) = run();
    let (second_action, second_tree) = run();

    assert_eq!(first_action, second_action);
    assert_eq!(first_tree, second_tree);
}

#[test]
fn test_repeated_search_rebuilds_the_tree() {
    let config = MCTSConfig::default().with_budget(150).with_seed(8);
    let mut mcts = MCTS::new(TicTacToe::new(), config);

    let first = mcts.search().unwrap();
    let first_tree = mcts.snapshot();
    let second = mcts.search().unwrap();

    assert_eq!(first, second);
    assert_eq!(first_tree, mcts.snapshot());
    assert_eq!(mcts.tree().root_node().visits(), 150);
}

#[test]
fn test_search_invariants_hold() {
    let budget = 400;
    let config = MCTSConfig::default().with_budget(budget).with_seed(17);
    let mut mcts = MCTS::new(TicTacToe::new(), config);
    mcts.search().unwrap();

    let tree = mcts.tree();
    assert_eq!(tree.root_node().visits(), budget as u64);
    mcts.snapshot().check_invariants().unwrap();

    for node in tree.iter() {
        if node.is_visited() {
            let mean = node.reward() / node.visits() as f64;
            assert!((node.value() - mean).abs() < 1e-12);
        } else {
            assert_eq!(node.value(), f64::NEG_INFINITY);
        }

        if node.is_expanded() {
            assert_eq!(node.children.len(), node.state.get_legal_actions().len());
        }
        if let Some(parent) = node.parent {
            assert_eq!(tree.get(parent).unwrap().depth + 1, node.depth);
            assert_eq!(node.mover, tree.get(parent).unwrap().player);
        }
    }
}

#[test]
fn test_apply_action_leaves_state_untouched() {
    let state = TicTacToe::new();
    let before = state.clone();

    let after_one = state.apply_action(&4).unwrap();
    let after_two = after_one.apply_action(&0).unwrap();

    assert_eq!(state, before);
    assert_eq!(after_one.board[0], None);
    assert_eq!(after_two.board[0], Some(Mark::O));
}

#[test]
fn test_unseeded_plan_returns_legal_move() {
    let state = TicTacToe::new();
    let action = plan(state.clone(), 200, 1.414, 5).unwrap();
    assert!(state.is_legal_action(&action));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let result = plan(TicTacToe::new(), 0, 1.414, 5);
    assert!(matches!(result, Err(MCTSError::InvalidConfiguration(_))));

    let result = plan(TicTacToe::new(), 10, -1.0, 5);
    assert!(matches!(result, Err(MCTSError::InvalidConfiguration(_))));
}

#[test]
fn test_root_is_node_zero() {
    let mcts = MCTS::new(TicTacToe::new(), MCTSConfig::default());
    let root = mcts.tree().root_node();

    assert_eq!(root.id, NodeId(0));
    assert_eq!(root.depth, 0);
    assert_eq!(root.parent, None);
    assert_eq!(root.action, None);
    assert_eq!(root.player, Mark::X);
}

#[test]
fn test_illegal_action_from_game_aborts_search() {
    let config = MCTSConfig::default().with_budget(20).with_seed(6);

    // The root's own move list is rejected during the very first expansion.
    let mut mcts = MCTS::new(Stubborn::new(1), config.clone());
    assert!(matches!(mcts.search(), Err(MCTSError::IllegalAction(_))));
    assert_eq!(mcts.tree().len(), 1);
    assert!(!mcts.tree().root_node().is_expanded());

    // A move that is never listed is simply never tried.
    let mut mcts = MCTS::new(Stubborn::new(7), config);
    assert!(mcts.search().is_ok());
}

#[test]
fn test_position_without_moves_reports_no_legal_actions() {
    let config = MCTSConfig::default().with_budget(5).with_seed(1);
    let mut mcts = MCTS::new(Stuck, config);

    assert_eq!(mcts.search(), Err(MCTSError::NoLegalActions));
    assert_eq!(mcts.tree().len(), 1);
    assert_eq!(mcts.tree().root_node().visits(), 5);
    assert_eq!(mcts.tree().root_node().value(), 0.0);
}
