//! Typing indicators.
//!
//! Sending side: [`TypingDebouncer`] turns draft edits into `typing-start` /
//! `typing-stop` signals. It emits a start on the empty-to-nonempty
//! transition, refreshes it while the user keeps typing, and emits a stop
//! after a quiet period or as soon as the draft is cleared.
//!
//! Receiving side: [`TypingTracker`] keeps one [`TypingState`] per
//! (room, user). A state counts as typing only until its `expires_at`, so a
//! lost `typing-stop` clears itself.

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};

/// Quiet period after the last edit before `typing-stop` is sent
pub const TYPING_WINDOW: Duration = Duration::from_secs(2);

/// Signals for the server, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingSignal {
    Start { room_id: String },
    Stop { room_id: String },
}

#[derive(Debug)]
enum TypingInput {
    /// The conversation in focus changed
    Room(Option<String>),
    /// The draft now reads this
    Draft(String),
}

/// Handle to the debounce task. The task ends, sending a final `typing-stop`
/// if one is owed, once this handle and every [`DraftSink`] are dropped.
pub struct TypingDebouncer {
    inputs: mpsc::UnboundedSender<TypingInput>,
}

impl TypingDebouncer {
    pub fn spawn(window: Duration, signals: mpsc::UnboundedSender<TypingSignal>) -> Self {
        let (inputs, rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(rx, signals, window));
        Self { inputs }
    }

    pub fn set_room(&self, room_id: Option<String>) {
        let _ = self.inputs.send(TypingInput::Room(room_id));
    }

    /// Report the current draft; an empty draft counts as cleared.
    pub fn draft_changed(&self, draft: &str) {
        let _ = self.inputs.send(TypingInput::Draft(draft.to_string()));
    }

    /// A sender usable from another thread (the line editor)
    pub fn draft_sink(&self) -> DraftSink {
        DraftSink {
            inputs: self.inputs.clone(),
        }
    }
}

/// Cloneable draft reporter
#[derive(Clone)]
pub struct DraftSink {
    inputs: mpsc::UnboundedSender<TypingInput>,
}

impl DraftSink {
    pub fn draft_changed(&self, draft: &str) {
        let _ = self.inputs.send(TypingInput::Draft(draft.to_string()));
    }
}

async fn debounce_loop(
    mut inputs: mpsc::UnboundedReceiver<TypingInput>,
    signals: mpsc::UnboundedSender<TypingSignal>,
    window: Duration,
) {
    let refresh_after = window / 2;
    let mut room: Option<String> = None;
    // Room we announced typing in, and when the last start went out
    let mut typing: Option<(String, Instant)> = None;
    let mut deadline: Option<Instant> = None;

    let stop = |typing: &mut Option<(String, Instant)>| {
        if let Some((room_id, _)) = typing.take() {
            let _ = signals.send(TypingSignal::Stop { room_id });
        }
    };

    loop {
        let armed = deadline;
        let quiet = async move {
            match armed {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            input = inputs.recv() => match input {
                None => {
                    stop(&mut typing);
                    break;
                }
                Some(TypingInput::Room(next)) => {
                    if next != room {
                        stop(&mut typing);
                        deadline = None;
                        room = next;
                    }
                }
                Some(TypingInput::Draft(draft)) => {
                    let Some(room_id) = room.clone() else {
                        continue;
                    };
                    if draft.trim().is_empty() || draft.starts_with('/') {
                        stop(&mut typing);
                        deadline = None;
                        continue;
                    }
                    let now = Instant::now();
                    let due = typing
                        .as_ref()
                        .is_none_or(|(_, sent_at)| now >= *sent_at + refresh_after);
                    if due {
                        let _ = signals.send(TypingSignal::Start { room_id: room_id.clone() });
                        typing = Some((room_id, now));
                    }
                    deadline = Some(now + window);
                }
            },
            _ = quiet => {
                stop(&mut typing);
                deadline = None;
            }
        }
    }
}

/// Typing state of one user in one room, as seen by the receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    pub room_id: String,
    pub user_id: String,
    pub is_typing: bool,
    pub expires_at: Instant,
}

impl TypingState {
    /// `is_typing`, unless the state has gone stale
    pub fn is_active(&self, now: Instant) -> bool {
        self.is_typing && now < self.expires_at
    }
}

#[derive(Debug)]
pub struct TypingTracker {
    window: Duration,
    states: HashMap<(String, String), TypingState>,
}

impl TypingTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            states: HashMap::new(),
        }
    }

    /// Record a `user-typing` event received at `now`.
    pub fn apply(&mut self, room_id: &str, user_id: &str, is_typing: bool, now: Instant) {
        let key = (room_id.to_string(), user_id.to_string());
        if !is_typing {
            self.states.remove(&key);
            return;
        }
        self.states.insert(
            key,
            TypingState {
                room_id: room_id.to_string(),
                user_id: user_id.to_string(),
                is_typing,
                expires_at: now + self.window,
            },
        );
    }

    pub fn is_typing(&self, room_id: &str, user_id: &str, now: Instant) -> bool {
        self.states
            .get(&(room_id.to_string(), user_id.to_string()))
            .is_some_and(|state| state.is_active(now))
    }

    /// Users currently typing in `room_id`, sorted
    pub fn typing_in(&self, room_id: &str, now: Instant) -> Vec<String> {
        let mut users: Vec<String> = self
            .states
            .values()
            .filter(|state| state.room_id == room_id && state.is_active(now))
            .map(|state| state.user_id.clone())
            .collect();
        users.sort();
        users
    }

    /// Forget expired states
    pub fn prune(&mut self, now: Instant) {
        self.states.retain(|_, state| state.is_active(now));
    }

    pub fn clear_room(&mut self, room_id: &str) {
        self.states.retain(|(room, _), _| room != room_id);
    }
}
