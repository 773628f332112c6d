//! Maps fired hotkey ids to their actions
//!
//! The action set is closed: a hotkey either enqueues a fixed vote token or
//! asks the main loop to shut down. The table is fixed at construction so a
//! given id always does the same thing for the life of the process.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::queue::VoteSender;

use super::keys::QUIT_HOTKEY_ID;

/// Vote token sent for each vote hotkey id
pub const VOTE_TOKENS: [(i32, &str); 5] = [(1, "#a"), (2, "#b"), (3, "#c"), (4, "#d"), (5, "#e")];

/// What a hotkey does when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Put a fixed token on the vote queue
    EnqueueToken(String),
    /// Leave the dispatch loop and shut down
    RequestShutdown,
}

/// Outcome of dispatching one hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep waiting for hotkeys
    Continue,
    /// Stop the dispatch loop
    Shutdown,
}

/// Hotkey id → action table
pub struct HotkeyDispatcher {
    actions: HashMap<i32, Action>,
    queue: VoteSender,
}

impl HotkeyDispatcher {
    /// Dispatcher with the five vote tokens and the quit hotkey
    pub fn new(queue: VoteSender) -> Self {
        let actions = VOTE_TOKENS
            .iter()
            .map(|(id, token)| (*id, Action::EnqueueToken(token.to_string())))
            .chain(std::iter::once((QUIT_HOTKEY_ID, Action::RequestShutdown)));
        Self::with_actions(queue, actions)
    }

    pub fn with_actions(
        queue: VoteSender,
        actions: impl IntoIterator<Item = (i32, Action)>,
    ) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            queue,
        }
    }

    /// Action bound to `id`, if any
    #[cfg(test)]
    pub fn action(&self, id: i32) -> Option<&Action> {
        self.actions.get(&id)
    }

    /// Run the action bound to `id`
    pub fn dispatch(&self, id: i32) -> Dispatch {
        match self.actions.get(&id) {
            Some(Action::EnqueueToken(token)) => {
                info!(id, %token, "vote hotkey");
                self.queue.enqueue(token.as_str());
                Dispatch::Continue
            }
            Some(Action::RequestShutdown) => {
                info!(id, "quit hotkey");
                Dispatch::Shutdown
            }
            None => {
                debug!(id, "no action bound to hotkey");
                Dispatch::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::vote_queue;

    #[test]
    fn test_vote_ids_enqueue_their_token_once() {
        let expected = ["#a", "#b", "#c", "#d", "#e"];
        for (id, token) in (1..=5).zip(expected) {
            let (tx, mut rx) = vote_queue();
            let dispatcher = HotkeyDispatcher::new(tx);

            assert_eq!(dispatcher.dispatch(id), Dispatch::Continue);
            assert_eq!(rx.try_dequeue().as_deref(), Some(token));
            assert_eq!(rx.try_dequeue(), None);
        }
    }

    #[test]
    fn test_quit_id_requests_shutdown_without_enqueue() {
        let (tx, mut rx) = vote_queue();
        let dispatcher = HotkeyDispatcher::new(tx);

        assert_eq!(dispatcher.dispatch(QUIT_HOTKEY_ID), Dispatch::Shutdown);
        assert_eq!(rx.try_dequeue(), None);
    }

    #[test]
    fn test_unbound_id_is_ignored() {
        let (tx, mut rx) = vote_queue();
        let dispatcher = HotkeyDispatcher::new(tx);

        assert!(dispatcher.action(7).is_none());
        assert_eq!(dispatcher.dispatch(7), Dispatch::Continue);
        assert_eq!(rx.try_dequeue(), None);
    }

    #[test]
    fn test_same_id_same_action() {
        let (tx, mut rx) = vote_queue();
        let dispatcher = HotkeyDispatcher::new(tx);

        dispatcher.dispatch(2);
        dispatcher.dispatch(2);
        assert_eq!(rx.try_dequeue().as_deref(), Some("#b"));
        assert_eq!(rx.try_dequeue().as_deref(), Some("#b"));
        assert_eq!(
            dispatcher.action(2),
            Some(&Action::EnqueueToken("#b".to_string()))
        );
    }

    #[test]
    fn test_custom_table() {
        let (tx, mut rx) = vote_queue();
        let dispatcher = HotkeyDispatcher::with_actions(
            tx,
            [
                (10, Action::EnqueueToken("!vote yes".to_string())),
                (11, Action::RequestShutdown),
            ],
        );

        assert_eq!(dispatcher.dispatch(10), Dispatch::Continue);
        assert_eq!(dispatcher.dispatch(11), Dispatch::Shutdown);
        assert_eq!(dispatcher.dispatch(1), Dispatch::Continue);
        assert_eq!(rx.try_dequeue().as_deref(), Some("!vote yes"));
        assert_eq!(rx.try_dequeue(), None);
    }
}
