#![allow(dead_code)]

use uct_planner::{GameState, MCTSError, Player};

/// Installs a test logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Player for Mark {}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

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

/// Tic-tac-toe with cells numbered 0..9 row by row
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TicTacToe {
    pub board: [Option<Mark>; 9],
    pub current_player: Mark,
}

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe {
            board: [None; 9],
            current_player: Mark::X,
        }
    }

    /// Builds a position from three rows of `X`, `O` and `.`
    ///
    /// X moves first, so X is to move whenever both sides have the same number of marks.
    pub fn from_rows(rows: [&str; 3]) -> Self {
        let mut board = [None; 9];
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.chars().enumerate() {
                board[r * 3 + c] = match cell {
                    'X' => Some(Mark::X),
                    'O' => Some(Mark::O),
                    _ => None,
                };
            }
        }

        let xs = board.iter().filter(|cell| **cell == Some(Mark::X)).count();
        let os = board.iter().filter(|cell| **cell == Some(Mark::O)).count();
        let current_player = if xs == os { Mark::X } else { Mark::O };

        TicTacToe {
            board,
            current_player,
        }
    }

    pub fn line_winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.board[a]?;
            (self.board[b] == Some(mark) && self.board[c] == Some(mark)).then_some(mark)
        })
    }

    /// Reflects the board left to right
    pub fn mirrored(&self) -> Self {
        let mut board = [None; 9];
        for (i, cell) in self.board.iter().enumerate() {
            board[mirror_index(i)] = *cell;
        }
        TicTacToe {
            board,
            current_player: self.current_player,
        }
    }
}

/// Cell index under a left-to-right reflection
pub fn mirror_index(index: usize) -> usize {
    let (row, col) = (index / 3, index % 3);
    row * 3 + (2 - col)
}

impl GameState for TicTacToe {
    type Action = usize;
    type Player = Mark;

    fn get_legal_actions(&self) -> Vec<usize> {
        if self.line_winner().is_some() {
            return vec![];
        }
        (0..9).filter(|&i| self.board[i].is_none()).collect()
    }

    fn apply_action(&self, action: &usize) -> uct_planner::Result<Self> {
        if !self.is_legal_action(action) {
            return Err(MCTSError::IllegalAction(format!(
                "cell {} on {:?}",
                action, self.board
            )));
        }

        let mut next = self.clone();
        next.board[*action] = Some(self.current_player);
        next.current_player = self.current_player.opponent();
        Ok(next)
    }

    fn is_terminal(&self) -> bool {
        self.line_winner().is_some() || self.board.iter().all(Option::is_some)
    }

    fn get_winner(&self) -> Option<Mark> {
        self.line_winner()
    }

    fn get_current_player(&self) -> Mark {
        self.current_player
    }
}

/// X to move, winning at cell 2 (the first legal cell)
pub fn x_wins_at_2() -> TicTacToe {
    TicTacToe::from_rows(["XX.", "OO.", "..."])
}

/// X to move, winning at cell 8 (the last legal cell)
pub fn x_wins_at_8() -> TicTacToe {
    TicTacToe::from_rows(["...", "OO.", "XX."])
}

/// X to move with cell 8 as the only empty cell; the game ends drawn
pub fn one_move_left() -> TicTacToe {
    TicTacToe::from_rows(["XOX", "XOO", "OX."])
}

/// X has already completed the top row
pub fn x_has_won() -> TicTacToe {
    TicTacToe::from_rows(["XXX", "OO.", "..."])
}

/// A game that lists `refused` among its moves and then rejects it
///
/// Every other move is accepted; the game ends drawn after four plies.
#[derive(Clone, Debug, PartialEq)]
pub struct Stubborn {
    pub refused: usize,
    pub plies: usize,
}

impl Stubborn {
    pub fn new(refused: usize) -> Self {
        Stubborn { refused, plies: 0 }
    }
}

impl GameState for Stubborn {
    type Action = usize;
    type Player = usize;

    fn get_legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return vec![];
        }
        vec![0, 1, 2]
    }

    fn apply_action(&self, action: &usize) -> uct_planner::Result<Self> {
        if *action == self.refused || *action > 2 {
            return Err(MCTSError::IllegalAction(format!("refused move {}", action)));
        }
        Ok(Stubborn {
            refused: self.refused,
            plies: self.plies + 1,
        })
    }

    fn is_terminal(&self) -> bool {
        self.plies >= 4
    }

    fn get_winner(&self) -> Option<usize> {
        None
    }

    fn get_current_player(&self) -> usize {
        self.plies % 2
    }
}

/// A live position in which the side to move has nothing to play
#[derive(Clone, Debug, PartialEq)]
pub struct Stuck;

impl GameState for Stuck {
    type Action = usize;
    type Player = usize;

    fn get_legal_actions(&self) -> Vec<usize> {
        vec![]
    }

    fn apply_action(&self, action: &usize) -> uct_planner::Result<Self> {
        Err(MCTSError::IllegalAction(format!("{} in a stuck position", action)))
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn get_winner(&self) -> Option<usize> {
        None
    }

    fn get_current_player(&self) -> usize {
        0
    }
}
