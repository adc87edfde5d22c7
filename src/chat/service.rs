use std::sync::Arc;

use chrono::{Local, Utc};
use log::{debug, error, warn};
use tokio::sync::Mutex;

use crate::auth::service::AuthService as _;
use crate::integration::gateway::{DataGateway as _, Gateway};
use crate::thread::model::Thread;
use crate::{auth, message, thread};

use super::model::ChatState;

const FETCH_THREADS_FAILED: &str = "Failed to fetch threads.";
const FETCH_MESSAGES_FAILED: &str = "Failed to fetch messages.";
const CREATE_THREAD_FAILED: &str = "Failed to create thread.";
const SEND_MESSAGE_FAILED: &str = "Failed to send message.";

/// The thread/message synchronization core.
///
/// Owns the [`ChatState`] for one session and orders asynchronous gateway
/// responses against user-driven changes: a message fetch is keyed by the
/// thread it was issued for and discarded if the selection moved on before it
/// resolved, and overlapping thread-list fetches resolve latest-wins through
/// an epoch token. Failed calls record a human-readable message in the
/// state's single error slot and leave the affected collection untouched.
///
/// Missing preconditions (no user, no selection, blank content) are silent
/// no-ops, not errors.
#[derive(Clone)]
pub struct ChatService {
    auth: auth::Service,
    gateway: Gateway,
    state: Arc<Mutex<ChatState>>,
}

impl ChatService {
    pub fn new(auth: auth::Service, gateway: Gateway) -> Self {
        Self {
            auth,
            gateway,
            state: Arc::new(Mutex::new(ChatState::default())),
        }
    }

    /// Snapshot of the current view state, for the presentation layer.
    pub async fn state(&self) -> ChatState {
        self.state.lock().await.clone()
    }
}

impl ChatService {
    /// Replaces the thread set with the user's threads, most recently
    /// updated first.
    ///
    /// Re-invocable whenever the session or the selection changes: it never
    /// duplicates threads and never steals an existing selection. When
    /// nothing was selected yet, the head thread becomes active and its
    /// messages are loaded.
    pub async fn load_threads(&self) {
        let Some(user) = self.auth.current_user().await else {
            debug!("Skipping thread fetch: no authenticated user");
            return;
        };

        let epoch = {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.thread_epoch += 1;
            state.thread_epoch
        };

        let fetched = self.gateway.get_threads(&user.sub).await;

        let selected_head = {
            let mut state = self.state.lock().await;

            if state.thread_epoch != epoch {
                debug!("Discarding stale thread fetch (epoch {epoch})");
                return;
            }

            state.is_loading = false;

            match fetched {
                Ok(threads) => {
                    state.threads = threads;

                    if state.active_thread.is_none() {
                        let head = state.threads.first().map(|t| t.id.clone());
                        state.active_thread = head;
                        state.active_thread.is_some()
                    } else {
                        false
                    }
                }
                Err(e) => {
                    error!("Thread fetch failed: {e}");
                    state.error = Some(FETCH_THREADS_FAILED.into());
                    false
                }
            }
        };

        if selected_head {
            self.load_messages().await;
        }
    }

    /// Replaces the message set with the active thread's messages, oldest
    /// first. With nothing selected the set is cleared rather than left
    /// stale from a previously viewed thread.
    pub async fn load_messages(&self) {
        let target = self.state.lock().await.active_thread.clone();

        let Some(thread_id) = target else {
            self.state.lock().await.messages.clear();
            return;
        };

        let fetched = self.gateway.get_messages(&thread_id).await;

        let mut state = self.state.lock().await;

        // The selection may have moved on while the fetch was in flight.
        if state.active_thread.as_ref() != Some(&thread_id) {
            debug!("Discarding message fetch for thread '{thread_id}': selection changed");
            return;
        }

        match fetched {
            Ok(messages) => state.messages = messages,
            Err(e) => {
                error!("Message fetch for thread '{thread_id}' failed: {e}");
                state.error = Some(FETCH_MESSAGES_FAILED.into());
            }
        }
    }

    /// Creates an empty thread titled after the current wall-clock time and
    /// makes it the active one.
    ///
    /// Returns `None` without contacting the gateway when unauthenticated,
    /// and `None` with the error slot set when the gateway refuses.
    pub async fn create_thread(&self) -> Option<thread::Id> {
        let user = self.auth.current_user().await?;
        let title = Thread::title_at(Local::now());

        match self.gateway.create_thread(&user.sub, &title).await {
            Ok(created) => {
                let id = created.id.clone();
                debug!("Created thread '{id}' titled '{title}'");

                let mut state = self.state.lock().await;
                state.threads.insert(0, created);
                state.active_thread = Some(id.clone());
                state.messages.clear();

                Some(id)
            }
            Err(e) => {
                error!("Thread creation failed: {e}");
                self.state.lock().await.error = Some(CREATE_THREAD_FAILED.into());
                None
            }
        }
    }

    /// Makes `id` the active thread and re-runs both loaders for it.
    ///
    /// Ownership is not re-validated here; the thread-list fetch already
    /// filters by the session's user.
    pub async fn select_thread(&self, id: thread::Id) {
        self.state.lock().await.active_thread = Some(id);

        self.load_messages().await;
        self.load_threads().await;
    }

    /// Persists the user's message followed by its echoed counterpart, then
    /// reflects both rows locally.
    ///
    /// The three remote steps run strictly in order, each one's failure
    /// short-circuiting the rest; only the final timestamp touch is
    /// best-effort. An echo failing after the user row was persisted leaves
    /// a remote orphan with no local reflection, which is accepted rather
    /// than retried or compensated.
    pub async fn send_message(&self, content: &str) {
        let Some(content) = message::model::sanitize(content) else {
            return;
        };

        let Some(user) = self.auth.current_user().await else {
            return;
        };

        let target = self.state.lock().await.active_thread.clone();
        let Some(thread_id) = target else {
            return;
        };

        let user_message = match self
            .gateway
            .create_message(&thread_id, &user.sub, true, content)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!("Sending message to thread '{thread_id}' failed: {e}");
                self.state.lock().await.error = Some(SEND_MESSAGE_FAILED.into());
                return;
            }
        };

        let echo = match self
            .gateway
            .create_message(&thread_id, &user.sub, false, content)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!("Echoing message in thread '{thread_id}' failed: {e}");
                self.state.lock().await.error = Some(SEND_MESSAGE_FAILED.into());
                return;
            }
        };

        if let Err(e) = self.gateway.touch_thread(&thread_id).await {
            warn!("Timestamp touch for thread '{thread_id}' failed: {e}");
        }

        let mut state = self.state.lock().await;

        // Append only if the rows still belong to the displayed thread.
        if state.active_thread.as_ref() == Some(&thread_id) {
            state.messages.push(user_message);
            state.messages.push(echo);
        }

        state.touch_thread(&thread_id, Utc::now());
    }
}
