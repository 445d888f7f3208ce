use gloo_net::http::{Method, Request, Response};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::model::{Candidate, Gender, Owner};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} while {context}")]
    Status { status: u16, context: String },
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl DataError {
    fn network<E: std::fmt::Display>(err: E) -> Self {
        Self::Network(err.to_string())
    }

    fn parse<E: std::fmt::Display>(err: E) -> Self {
        Self::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub images: Vec<String>,
    pub description: String,
    pub owner_id: String,
    pub created_at: String,
    #[serde(default, skip_serializing)]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing)]
    pub distance: Option<f64>,
    /// Owner row, present when the query embeds `users(*)`.
    #[serde(default, skip_serializing)]
    pub users: Option<User>,
}

impl Pet {
    pub fn into_candidate(self) -> Candidate {
        let owner_name = self
            .users
            .as_ref()
            .map(|user| user.name.clone())
            .unwrap_or_default();
        Candidate {
            id: self.id,
            name: self.name,
            images: self.images,
            gender: self.gender,
            distance_km: self.distance.unwrap_or(0.0),
            breed: self.breed,
            bio: self.description,
            owner: Owner {
                name: owner_name,
                gender: None,
            },
            likes_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub age: u32,
    pub images: Vec<String>,
    pub description: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub liked: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMatch {
    pub user_id: String,
    pub pet_id: String,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
    pub read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub text: String,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    #[serde(flatten)]
    message: &'a NewMessage,
    read: bool,
}

#[derive(Serialize)]
struct ReadFlag {
    read: bool,
}

fn request(backend: &BackendConfig, method: Method, url: &str) -> Request {
    Request::new(url)
        .method(method)
        .header("apikey", &backend.api_key)
        .header("Authorization", &format!("Bearer {}", backend.api_key))
}

/// Asks for the affected row back as a single object instead of an array.
fn single(request: Request) -> Request {
    request
        .header("Accept", "application/vnd.pgrst.object+json")
        .header("Prefer", "return=representation")
}

async fn read_body<T: DeserializeOwned>(
    response: Response,
    context: &str,
    subject: &str,
) -> Result<T, DataError> {
    // single-object requests answer 406 when no row matched
    if response.status() == 404 || response.status() == 406 {
        return Err(DataError::NotFound(subject.to_string()));
    }

    if !response.ok() {
        return Err(DataError::Status {
            status: response.status(),
            context: context.to_string(),
        });
    }

    let text = response.text().await.map_err(DataError::network)?;
    serde_json::from_str(&text).map_err(DataError::parse)
}

async fn insert<B: Serialize, T: DeserializeOwned>(
    backend: &BackendConfig,
    table: &str,
    body: &B,
) -> Result<T, DataError> {
    let url = backend.table_url(table);
    let response = single(request(backend, Method::POST, &url))
        .json(&[body])
        .map_err(DataError::parse)?
        .send()
        .await
        .map_err(|err| {
            warn!("Insert into {} failed: {}", table, err);
            DataError::network(err)
        })?;
    read_body(response, &format!("creating a {table} row"), table).await
}

async fn select<T: DeserializeOwned>(
    backend: &BackendConfig,
    table: &str,
    query: &str,
    one: bool,
) -> Result<T, DataError> {
    let url = format!("{}?{}", backend.table_url(table), query);
    debug!("GET {}", url);
    let mut req = request(backend, Method::GET, &url);
    if one {
        req = single(req);
    }
    let response = req.send().await.map_err(|err| {
        warn!("Query on {} failed: {}", table, err);
        DataError::network(err)
    })?;
    read_body(response, &format!("reading {table}"), table).await
}

pub async fn create_user(backend: &BackendConfig, user: &NewUser) -> Result<User, DataError> {
    insert(backend, "users", user).await
}

pub async fn get_user_by_id(backend: &BackendConfig, user_id: &str) -> Result<User, DataError> {
    select(backend, "users", &eq_filter("id", user_id), true).await
}

pub async fn create_pet(backend: &BackendConfig, pet: &NewPet) -> Result<Pet, DataError> {
    insert(backend, "pets", pet).await
}

pub async fn get_pets(backend: &BackendConfig) -> Result<Vec<Pet>, DataError> {
    select(backend, "pets", "select=*,users(*)", false).await
}

pub async fn get_pets_by_user_id(
    backend: &BackendConfig,
    user_id: &str,
) -> Result<Vec<Pet>, DataError> {
    select(backend, "pets", &eq_filter("owner_id", user_id), false).await
}

pub async fn create_match(backend: &BackendConfig, new_match: &NewMatch) -> Result<Match, DataError> {
    insert(backend, "matches", new_match).await
}

pub async fn get_matches(backend: &BackendConfig, user_id: &str) -> Result<Vec<Match>, DataError> {
    let query = format!("{}&liked=eq.true", eq_filter("user_id", user_id));
    select(backend, "matches", &query, false).await
}

pub async fn send_message(
    backend: &BackendConfig,
    message: &NewMessage,
) -> Result<Message, DataError> {
    debug!("Sending message to {}", message.receiver_id);
    let outgoing = OutgoingMessage {
        message,
        read: false,
    };
    insert(backend, "messages", &outgoing).await
}

pub async fn get_messages(
    backend: &BackendConfig,
    user_id: &str,
    other_id: &str,
) -> Result<Vec<Message>, DataError> {
    select(backend, "messages", &conversation_query(user_id, other_id), false).await
}

pub async fn mark_message_as_read(
    backend: &BackendConfig,
    message_id: &str,
) -> Result<Message, DataError> {
    let url = format!(
        "{}?{}",
        backend.table_url("messages"),
        eq_filter("id", message_id)
    );
    let response = single(request(backend, Method::PATCH, &url))
        .json(&ReadFlag { read: true })
        .map_err(DataError::parse)?
        .send()
        .await
        .map_err(DataError::network)?;
    read_body(response, "marking a message as read", "message").await
}

fn eq_filter(column: &str, value: &str) -> String {
    format!("select=*&{column}=eq.{value}")
}

/// Both directions of a conversation, oldest first.
fn conversation_query(user_id: &str, other_id: &str) -> String {
    format!(
        "select=*&or=(and(sender_id.eq.{user_id},receiver_id.eq.{other_id}),and(sender_id.eq.{other_id},receiver_id.eq.{user_id}))&order=created_at.asc"
    )
}
