//! Tic-Tac-Toe self-play for the MCTS planners
//!
//! The rollout planner plays X and the recursive-backup planner plays O.
//! Run with `RUST_LOG=debug` to see the root statistics behind every move,
//! and pass a number to change the seed.

use std::fmt;

use uct_planner::{Action, GameState, MCTSConfig, MCTSError, RecursiveMCTS, MCTS};

fn main() -> Result<(), MCTSError> {
    // Initialize logging
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(2024);

    println!("MCTS Tic-Tac-Toe Self-Play (seed {})", seed);
    println!("=====================================");
    println!();

    let mut game = TicTacToe::new();

    let config = MCTSConfig::default()
        .with_exploration_constant(1.414)
        .with_budget(2_000)
        .with_max_depth(9);

    let mut turn = 0;
    while !game.is_terminal() {
        println!("{}", game);

        let config = config.clone().with_seed(seed + turn);
        let action = match game.current_player {
            Player::X => {
                let mut mcts = MCTS::new(game.clone(), config);
                let action = mcts.search()?;
                println!("{}", mcts.get_statistics().summary());
                action
            }
            Player::O => {
                let mut engine = RecursiveMCTS::new(game.clone(), config.with_discount(0.95));
                let action = engine.search()?;
                println!("{}", engine.get_statistics().summary());
                action
            }
        };

        println!(
            "{:?} chooses: {} (row {}, col {})",
            game.current_player,
            action.index,
            action.index / 3,
            action.index % 3
        );
        println!();

        game = game.apply_action(&action)?;
        turn += 1;
    }

    // Display final state
    println!("{}", game);

    if let Some(winner) = game.winner() {
        println!("Player {:?} wins!", winner);
    } else {
        println!("The game is a draw!");
    }
    Ok(())
}

/// Players in Tic-Tac-Toe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Player {
    X,
    O,
}

impl uct_planner::Player for Player {}

/// Tic-Tac-Toe move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    /// Board position index (0-8)
    index: usize,
}

impl Action for Move {}

/// Tic-Tac-Toe game state
#[derive(Clone)]
struct TicTacToe {
    /// Board representation (None = empty, Some(Player) = occupied)
    board: [Option<Player>; 9],

    /// Current player's turn
    current_player: Player,

    /// Number of moves played so far
    moves_played: usize,
}

impl TicTacToe {
    /// Creates a new empty Tic-Tac-Toe board
    fn new() -> Self {
        TicTacToe {
            board: [None; 9],
            current_player: Player::X,
            moves_played: 0,
        }
    }

    /// Returns the player holding a full line, if any
    fn winner(&self) -> Option<Player> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];

        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.board[a]?;
            (self.board[b] == Some(mark) && self.board[c] == Some(mark)).then_some(mark)
        })
    }
}

impl GameState for TicTacToe {
    type Action = Move;
    type Player = Player;

    fn get_legal_actions(&self) -> Vec<Self::Action> {
        if self.winner().is_some() {
            return Vec::new();
        }
        (0..9)
            .filter(|&index| self.board[index].is_none())
            .map(|index| Move { index })
            .collect()
    }

    fn apply_action(&self, action: &Self::Action) -> uct_planner::Result<Self> {
        if !self.is_legal_action(action) {
            return Err(MCTSError::IllegalAction(format!(
                "square {} is not available",
                action.index
            )));
        }

        let mut new_state = self.clone();

        // Make the move
        new_state.board[action.index] = Some(self.current_player);
        new_state.moves_played = self.moves_played + 1;

        // Switch player
        new_state.current_player = match self.current_player {
            Player::X => Player::O,
            Player::O => Player::X,
        };

        Ok(new_state)
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.moves_played == 9
    }

    fn get_winner(&self) -> Option<Self::Player> {
        self.winner()
    }

    fn get_current_player(&self) -> Self::Player {
        self.current_player
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2")?;
        for row in 0..3 {
            write!(f, "{} ", row)?;
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.board[index] {
                    Some(Player::X) => "X",
                    Some(Player::O) => "O",
                    None => ".",
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nPlayer {:?}'s turn", self.current_player)?;
        Ok(())
    }
}
