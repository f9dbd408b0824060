//! Turn-based multi-agent game abstraction.

/// An immutable snapshot of a turn-based game.
///
/// Agent 0 is the maximizing agent the tree search plays for; agents
/// `1..num_agents()` are adversaries (or chance agents under expectimax).
/// [`GameState::generate_successor`] returns a new state and never mutates
/// `self`.
pub trait GameState: Sized {
    /// A move available to one agent
    type Action: Clone;

    /// Total number of agents taking turns, the maximizer included.
    fn num_agents(&self) -> usize;

    /// Moves `agent` may take from this state, in enumeration order.
    fn legal_actions(&self, agent: usize) -> Vec<Self::Action>;

    /// State after `agent` plays `action`.
    fn generate_successor(&self, agent: usize, action: &Self::Action) -> Self;

    fn is_win(&self) -> bool;

    fn is_lose(&self) -> bool;
}
