use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::message::model::Message;
use crate::thread::model::Thread;
use crate::{thread, user};

pub type Gateway = Arc<dyn DataGateway + Send + Sync>;

/// The remote data store, reduced to the five operations the core issues.
///
/// Every method is a plain request/response suspension point; ordering and
/// staleness concerns live entirely with the caller.
#[async_trait]
pub trait DataGateway {
    /// All threads owned by `user`, ordered by `updated_at` descending.
    async fn get_threads(&self, user: &user::Sub) -> super::Result<Vec<Thread>>;

    /// All messages in `thread`, ordered by `created_at` ascending.
    async fn get_messages(&self, thread: &thread::Id) -> super::Result<Vec<Message>>;

    async fn create_thread(&self, user: &user::Sub, title: &str) -> super::Result<Thread>;

    async fn create_message(
        &self,
        thread: &thread::Id,
        user: &user::Sub,
        is_user: bool,
        content: &str,
    ) -> super::Result<Message>;

    /// Advances the thread's `updated_at` on the remote store.
    async fn touch_thread(&self, thread: &thread::Id) -> super::Result<DateTime<Utc>>;
}

const GET_THREADS: &str = r"
    query GetThreads($userId: String!) {
        threads(
            where: { user_id: { _eq: $userId } }
            order_by: { updated_at: desc }
        ) {
            id
            user_id
            title
            created_at
            updated_at
        }
    }";

const GET_MESSAGES: &str = r"
    query GetMessages($threadId: uuid!) {
        messages(
            where: { thread_id: { _eq: $threadId } }
            order_by: { created_at: asc }
        ) {
            id
            thread_id
            user_id
            is_user
            content
            created_at
        }
    }";

const CREATE_THREAD: &str = r"
    mutation CreateThread($userId: String!, $title: String!) {
        insert_threads_one(object: { user_id: $userId, title: $title }) {
            id
            user_id
            title
            created_at
            updated_at
        }
    }";

const CREATE_MESSAGE: &str = r"
    mutation CreateMessage($threadId: uuid!, $userId: String!, $isUser: Boolean!, $content: String!) {
        insert_messages_one(
            object: {
                thread_id: $threadId
                user_id: $userId
                is_user: $isUser
                content: $content
            }
        ) {
            id
            thread_id
            user_id
            is_user
            content
            created_at
        }
    }";

const UPDATE_THREAD_TIMESTAMP: &str = r"
    mutation UpdateThreadTimestamp($threadId: uuid!, $updatedAt: timestamptz!) {
        update_threads_by_pk(
            pk_columns: { id: $threadId }
            _set: { updated_at: $updatedAt }
        ) {
            id
            updated_at
        }
    }";

const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

#[derive(Clone)]
pub struct Config {
    graphql_url: Url,
    admin_secret: Option<String>,
}

impl Config {
    pub fn new(graphql_url: impl AsRef<str>, admin_secret: Option<String>) -> Self {
        Self {
            graphql_url: Url::parse(graphql_url.as_ref()).expect("Invalid GraphQL URL"),
            admin_secret,
        }
    }
}

#[derive(Clone)]
pub struct GraphQlGateway {
    cfg: Config,
    http: Arc<reqwest::Client>,
}

impl GraphQlGateway {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            http: Arc::new(super::init_http_client()),
        }
    }

    async fn execute<T>(&self, query: &'static str, variables: serde_json::Value) -> super::Result<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.cfg.graphql_url.clone())
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(secret) = &self.cfg.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }

        let envelope = request.send().await?.json::<Envelope<T>>().await?;

        if let Some(e) = envelope.errors.first() {
            return Err(super::Error::Graphql(e.message.clone()));
        }

        envelope.data.ok_or(super::Error::MalformedResponse("data"))
    }
}

#[async_trait]
impl DataGateway for GraphQlGateway {
    async fn get_threads(&self, user: &user::Sub) -> super::Result<Vec<Thread>> {
        debug!("Fetching threads for sub '{user}'");

        self.execute::<ThreadsData>(GET_THREADS, json!({ "userId": user }))
            .await
            .map(|data| data.threads)
    }

    async fn get_messages(&self, thread: &thread::Id) -> super::Result<Vec<Message>> {
        debug!("Fetching messages for thread '{thread}'");

        self.execute::<MessagesData>(GET_MESSAGES, json!({ "threadId": thread }))
            .await
            .map(|data| data.messages)
    }

    async fn create_thread(&self, user: &user::Sub, title: &str) -> super::Result<Thread> {
        self.execute::<CreateThreadData>(
            CREATE_THREAD,
            json!({ "userId": user, "title": title }),
        )
        .await?
        .insert_threads_one
        .ok_or(super::Error::MalformedResponse("insert_threads_one"))
    }

    async fn create_message(
        &self,
        thread: &thread::Id,
        user: &user::Sub,
        is_user: bool,
        content: &str,
    ) -> super::Result<Message> {
        self.execute::<CreateMessageData>(
            CREATE_MESSAGE,
            json!({
                "threadId": thread,
                "userId": user,
                "isUser": is_user,
                "content": content,
            }),
        )
        .await?
        .insert_messages_one
        .ok_or(super::Error::MalformedResponse("insert_messages_one"))
    }

    async fn touch_thread(&self, thread: &thread::Id) -> super::Result<DateTime<Utc>> {
        self.execute::<TouchThreadData>(
            UPDATE_THREAD_TIMESTAMP,
            json!({ "threadId": thread, "updatedAt": Utc::now() }),
        )
        .await?
        .update_threads_by_pk
        .map(|touched| touched.updated_at)
        .ok_or(super::Error::MalformedResponse("update_threads_by_pk"))
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct ThreadsData {
    threads: Vec<Thread>,
}

#[derive(Deserialize)]
struct MessagesData {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct CreateThreadData {
    insert_threads_one: Option<Thread>,
}

#[derive(Deserialize)]
struct CreateMessageData {
    insert_messages_one: Option<Message>,
}

#[derive(Deserialize)]
struct TouchThreadData {
    update_threads_by_pk: Option<TouchedThread>,
}

#[derive(Deserialize)]
struct TouchedThread {
    updated_at: DateTime<Utc>,
}
