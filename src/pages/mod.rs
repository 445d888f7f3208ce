pub mod community;
pub mod dating;
pub mod experts;
pub mod messages;
pub mod profile;

#[derive(PartialEq, Clone)]
pub enum FetchStatus {
    Idle,
    Loading,
    Error(String),
}
