//! Traits defining game state representation for MCTS.
//!
//! The GameState trait is the only interface the planner needs from a concrete game.
//! The search never looks at board internals; move generation, move application and
//! end-of-game detection all go through this contract.

use std::fmt::Debug;

use rand::{seq::SliceRandom, Rng};

use crate::Result;

/// Trait for actions that can be taken in a game
///
/// Actions are stored on tree nodes and handed back to the caller as the recommended move.
pub trait Action: Clone + Debug + PartialEq {}

/// Trait for players in a game
///
/// Players are compared against the winner of a finished game to assign credit.
pub trait Player: Clone + Debug + PartialEq {}

/// Trait defining the game state interface required for MCTS
///
/// A state is a fully determined position and behaves like a value: applying an action
/// must never mutate the receiver. Implementations may copy their board on every move or
/// share structure between states, as long as the original stays untouched.
pub trait GameState: Clone {
    /// The type of actions that can be taken in this game
    type Action: Action;

    /// The type of players in this game
    type Player: Player;

    /// Returns every legal action from this state, in a stable order
    ///
    /// The order matters: children are created in this order and ties during selection
    /// resolve to the earliest child. An empty list means the side to move has no moves.
    ///
    /// # Example
    ///
    /// ```
    /// # use uct_planner::{GameState, Action, Player};
    /// # #[derive(Debug, Clone, PartialEq)]
    /// # struct MyAction(usize);
    /// # impl Action for MyAction {}
    /// # #[derive(Debug, Clone, PartialEq)]
    /// # struct MyPlayer;
    /// # impl Player for MyPlayer {}
    /// # #[derive(Clone)]
    /// # struct MyGame { /* ... */ }
    /// # impl GameState for MyGame {
    /// # type Action = MyAction;
    /// # type Player = MyPlayer;
    /// fn get_legal_actions(&self) -> Vec<MyAction> {
    ///     // Return all valid moves in the current position
    ///     vec![MyAction(0), MyAction(1), MyAction(2)]
    /// }
    /// # fn apply_action(&self, _: &MyAction) -> uct_planner::Result<Self> { Ok(self.clone()) }
    /// # fn is_terminal(&self) -> bool { false }
    /// # fn get_winner(&self) -> Option<MyPlayer> { None }
    /// # fn get_current_player(&self) -> MyPlayer { MyPlayer }
    /// # }
    /// ```
    fn get_legal_actions(&self) -> Vec<Self::Action>;

    /// Applies an action, returning the resulting state
    ///
    /// Must fail with [`MCTSError::IllegalAction`](crate::MCTSError::IllegalAction) when
    /// `action` is not currently legal, and must leave `self` unchanged either way.
    fn apply_action(&self, action: &Self::Action) -> Result<Self>;

    /// Returns true if the game has ended, by a win or because no moves remain
    fn is_terminal(&self) -> bool;

    /// Returns the winner of a finished game
    ///
    /// Only meaningful when [`is_terminal`](GameState::is_terminal) is true.
    /// `None` on a terminal state means the game was drawn.
    fn get_winner(&self) -> Option<Self::Player>;

    /// Returns the player whose turn it is in this state
    fn get_current_player(&self) -> Self::Player;

    /// Returns true if `action` is among this state's legal actions
    fn is_legal_action(&self, action: &Self::Action) -> bool {
        self.get_legal_actions().contains(action)
    }

    /// Plays uniformly random legal moves from this state until the game ends
    ///
    /// Returns the winner of the final position, or `None` for a draw. A non-terminal
    /// position without legal moves ends the playout as a draw.
    fn simulate_random_playout<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<Self::Player>> {
        let mut current_state = self.clone();

        while !current_state.is_terminal() {
            let legal_actions = current_state.get_legal_actions();
            let Some(action) = legal_actions.choose(rng) else {
                return Ok(None);
            };
            current_state = current_state.apply_action(action)?;
        }

        Ok(current_state.get_winner())
    }
}

impl Player for usize {}
impl Player for u8 {}
impl Player for i32 {}
impl Player for char {}
impl Player for String {}

impl Action for usize {}
impl Action for u8 {}
impl Action for (usize, usize) {}
