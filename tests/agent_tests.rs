//! End-to-end behaviour of the MCTS agent on Nim.

use mcts::games::nim::{NimMove, NimState};
use mcts::{GameRunner, GameState, MctsAgent, MctsOptions, Player, RandomPlayer};

fn agent(player_id: i32, options: MctsOptions) -> MctsAgent<NimState> {
    MctsAgent::new(player_id, options).expect("valid options")
}

#[test]
fn test_finds_winning_move() {
    // 9 stones: taking 1 leaves the opponent on a multiple of 4.
    let mut agent = agent(1, MctsOptions::default().with_iterations(5000).with_seed(1));
    let state = NimState::new(9, 3);
    assert_eq!(agent.select_move(&state).unwrap(), NimMove(1));
}

#[test]
fn test_tree_follows_opponent_reply() {
    let options = MctsOptions::default().with_iterations(2000).with_seed(2);
    let mut agent = agent(1, options);
    let mut state = NimState::new(21, 3);

    let first = agent.select_move(&state).unwrap();
    assert!(state.make_move(&first));

    // The opponent answers with the reply the agent explored the most.
    let tree = agent.tree();
    let reply_node = tree.most_visited_child(tree.root()).unwrap();
    let reply = *tree.node(reply_node).mv().unwrap();
    let prior_visits = tree.node(reply_node).visits();
    let prior_wins = tree.node(reply_node).wins();
    assert!(prior_visits > 0);
    assert!(state.make_move(&reply));

    agent.select_move(&state).unwrap();
    let searched = agent.previous_tree().unwrap();
    let root = searched.root_node();
    assert_eq!(root.mv(), Some(&reply));
    assert_eq!(root.player(), Some(-1));
    assert!(root.parent().is_none());
    assert_eq!(root.visits(), prior_visits + 2000);
    assert!(root.wins() >= prior_wins);
    assert!(searched.validate_invariants().is_ok());
}

#[test]
fn test_parallel_search_counts_every_rollout() {
    let options = MctsOptions::default()
        .with_iterations(1000)
        .with_rollouts_per_iteration(3)
        .with_threads(4)
        .with_seed(3);
    let mut agent = agent(1, options);

    agent.select_move(&NimState::new(25, 3)).unwrap();
    let stats = agent.last_statistics();
    assert_eq!(stats.iterations, 1000);
    assert_eq!(stats.rollouts, 3000);

    let searched = agent.previous_tree().unwrap();
    assert_eq!(searched.root_node().visits(), 3000);
    assert_eq!(stats.total_nodes, searched.len());
    assert!(searched.validate_invariants().is_ok());
}

#[test]
fn test_invariants_hold_through_a_whole_game() {
    let mut agent = agent(-1, MctsOptions::default().with_iterations(500).with_threads(2).with_seed(4));
    let mut opponent = RandomPlayer::with_seed(4);
    let mut state = NimState::new(30, 4);

    while state.get_winner().is_none() && !state.get_possible_moves().is_empty() {
        let mv = if state.get_current_player() == -1 {
            let mv = agent.select_move(&state).unwrap();
            assert!(agent.tree().root_node().parent().is_none());
            assert!(agent.tree().validate_invariants().is_ok());
            assert!(agent.previous_tree().unwrap().validate_invariants().is_ok());
            assert_eq!(agent.previous_move(), Some(&mv));
            mv
        } else {
            Player::<NimState>::select_move(&mut opponent, &state).unwrap()
        };
        assert!(state.make_move(&mv));
    }
}

#[test]
fn test_agent_beats_random_player() {
    let mut mcts_wins = 0;
    for game in 0..4u64 {
        let agent = agent(1, MctsOptions::default().with_iterations(3000).with_seed(10 + game));
        let mut runner: GameRunner<NimState> =
            GameRunner::new(Box::new(agent), Box::new(RandomPlayer::with_seed(100 + game)));
        if runner.play(NimState::new(13, 3)).unwrap().winner == 1 {
            mcts_wins += 1;
        }
    }
    assert!(mcts_wins >= 3, "MCTS won only {} of 4 games", mcts_wins);
}
