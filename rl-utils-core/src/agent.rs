//! Agent trait

use crate::TransitionBatch;

/// Core agent trait
///
/// An agent picks actions and learns from batches of transitions. How it
/// learns is entirely its own business.
pub trait Agent {
    /// State type observed by the agent
    type State;
    /// Action type produced by the agent
    type Action;

    /// Select an action for the given state
    fn take_action(&mut self, state: &Self::State) -> crate::Result<Self::Action>;

    /// Learn from a batch of transitions
    fn update(&mut self, batch: &TransitionBatch<Self::State, Self::Action>) -> crate::Result<()>;
}

impl<G: Agent + ?Sized> Agent for &mut G {
    type State = G::State;
    type Action = G::Action;

    fn take_action(&mut self, state: &Self::State) -> crate::Result<Self::Action> {
        (**self).take_action(state)
    }

    fn update(&mut self, batch: &TransitionBatch<Self::State, Self::Action>) -> crate::Result<()> {
        (**self).update(batch)
    }
}
