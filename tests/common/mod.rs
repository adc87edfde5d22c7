#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, Notify};

use echochat::auth::service::AuthServiceImpl;
use echochat::chat::service::ChatService;
use echochat::integration::gateway::DataGateway;
use echochat::integration::idp::IdentityProvider;
use echochat::message::model::Message;
use echochat::thread::model::Thread;
use echochat::user::model::UserInfo;
use echochat::{auth, integration, message, thread, user};

pub const SUB: &str = "auth0|u1";

pub fn sub() -> user::Sub {
    user::Sub(SUB.to_string())
}

pub fn auth_service(idp: Arc<FakeIdp>) -> auth::Service {
    Arc::new(AuthServiceImpl::new(idp))
}

pub fn chat_service(gateway: Arc<FakeGateway>, idp: Arc<FakeIdp>) -> ChatService {
    ChatService::new(auth_service(idp), gateway)
}

pub struct FakeIdp {
    user: Mutex<Option<UserInfo>>,
    fetches: AtomicUsize,
}

impl FakeIdp {
    pub fn authenticated() -> Arc<Self> {
        Arc::new(Self {
            user: Mutex::new(Some(UserInfo::new(sub(), "Test User", "u1@example.com"))),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            user: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdp {
    async fn fetch_user(&self) -> integration::Result<Option<UserInfo>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.lock().await.clone())
    }

    async fn sign_out(&self) -> integration::Result<()> {
        *self.user.lock().await = None;
        Ok(())
    }
}

/// In-memory stand-in for the remote GraphQL store.
///
/// Fetches snapshot their result before waiting on an optional gate, so a
/// delayed response resolves with the data as it was at issue time, the way
/// a slow network response would.
#[derive(Default)]
pub struct FakeGateway {
    threads: Mutex<Vec<Thread>>,
    messages: Mutex<Vec<Message>>,
    calls: AtomicUsize,
    fail_thread_fetches: AtomicBool,
    fail_message_fetches: AtomicBool,
    message_writes_before_failure: Mutex<Option<usize>>,
    thread_fetch_gate: Mutex<Option<Arc<Notify>>>,
    message_fetch_gates: Mutex<HashMap<thread::Id, Arc<Notify>>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Total gateway calls issued, across all operations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_thread_fetches(&self) {
        self.fail_thread_fetches.store(true, Ordering::SeqCst);
    }

    pub fn fail_message_fetches(&self) {
        self.fail_message_fetches.store(true, Ordering::SeqCst);
    }

    /// Lets `writes` message inserts through, then fails the rest.
    pub async fn fail_message_writes_after(&self, writes: usize) {
        *self.message_writes_before_failure.lock().await = Some(writes);
    }

    /// Holds the next thread fetch until the returned gate is notified.
    pub async fn delay_next_thread_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.thread_fetch_gate.lock().await = Some(gate.clone());
        gate
    }

    /// Holds the next message fetch for `thread` until the gate is notified.
    pub async fn delay_next_message_fetch(&self, thread: &thread::Id) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.message_fetch_gates
            .lock()
            .await
            .insert(thread.clone(), gate.clone());
        gate
    }

    pub async fn seed_thread(&self, owner: &user::Sub, title: &str) -> thread::Id {
        let now = Utc::now();
        let thread = Thread {
            id: thread::Id::random(),
            user_id: owner.clone(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };

        let id = thread.id.clone();
        self.threads.lock().await.push(thread);
        id
    }

    pub async fn seed_message(&self, thread: &thread::Id, owner: &user::Sub, content: &str) {
        self.messages.lock().await.push(Message {
            id: message::Id::random(),
            thread_id: thread.clone(),
            user_id: owner.clone(),
            is_user: true,
            content: content.to_string(),
            created_at: Utc::now(),
        });
    }

    pub async fn stored_messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    fn rejected<T>() -> integration::Result<T> {
        Err(integration::Error::Graphql("permission denied".to_string()))
    }
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn get_threads(&self, user: &user::Sub) -> integration::Result<Vec<Thread>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_thread_fetches.load(Ordering::SeqCst) {
            return Self::rejected();
        }

        let mut snapshot = self
            .threads
            .lock()
            .await
            .iter()
            .filter(|t| &t.user_id == user)
            .cloned()
            .collect::<Vec<_>>();

        let gate = self.thread_fetch_gate.lock().await.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        snapshot.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(snapshot)
    }

    async fn get_messages(&self, thread: &thread::Id) -> integration::Result<Vec<Message>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_message_fetches.load(Ordering::SeqCst) {
            return Self::rejected();
        }

        let mut snapshot = self
            .messages
            .lock()
            .await
            .iter()
            .filter(|m| &m.thread_id == thread)
            .cloned()
            .collect::<Vec<_>>();

        let gate = self.message_fetch_gates.lock().await.remove(thread);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        snapshot.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(snapshot)
    }

    async fn create_thread(&self, user: &user::Sub, title: &str) -> integration::Result<Thread> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now();
        let thread = Thread {
            id: thread::Id::random(),
            user_id: user.clone(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.threads.lock().await.push(thread.clone());
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread: &thread::Id,
        user: &user::Sub,
        is_user: bool,
        content: &str,
    ) -> integration::Result<Message> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(remaining) = self.message_writes_before_failure.lock().await.as_mut() {
            if *remaining == 0 {
                return Self::rejected();
            }
            *remaining -= 1;
        }

        let message = Message {
            id: message::Id::random(),
            thread_id: thread.clone(),
            user_id: user.clone(),
            is_user,
            content: content.to_string(),
            created_at: Utc::now(),
        };

        self.messages.lock().await.push(message.clone());
        Ok(message)
    }

    async fn touch_thread(
        &self,
        thread: &thread::Id,
    ) -> integration::Result<chrono::DateTime<Utc>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now();
        if let Some(stored) = self
            .threads
            .lock()
            .await
            .iter_mut()
            .find(|t| &t.id == thread)
        {
            stored.updated_at = now;
        }

        Ok(now)
    }
}
