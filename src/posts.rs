use std::cmp::Reverse;
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{
    load_or, persist, StateStore, BOOKMARKED_POSTS_KEY, LIKED_POSTS_KEY, POSTS_KEY,
    POST_COMMENTS_KEY,
};

pub const DOG_BREEDS: &[&str] = &[
    "Golden Retriever",
    "German Shepherd",
    "Labrador",
    "Poodle",
    "Bulldog",
    "Beagle",
    "Husky",
    "Pomeranian",
    "Chihuahua",
    "Shih Tzu",
    "Yorkshire Terrier",
    "Border Collie",
    "Rottweiler",
    "Doberman",
    "Corgi",
    "Other",
];

pub const POST_CATEGORIES: &[&str] = &[
    "Daily Sharing",
    "Health Concerns",
    "Medications",
    "Food",
    "Cleaning Tools",
    "Training",
    "Behavior",
    "Grooming",
    "Exercise",
    "Travel Tips",
    "Pet Products",
    "Vet Visits",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub pet_type: String,
    pub likes_count: u32,
    pub comments_count: u32,
    pub time_since: String,
    pub is_liked: bool,
    pub is_bookmarked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub breed: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("a title is required")]
    MissingTitle,
    #[error("the post needs some content")]
    MissingContent,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.content.trim().is_empty() {
            return Err(DraftError::MissingContent);
        }
        Ok(())
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    /// Categories first, then the breed.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = self.categories.clone();
        if !self.breed.is_empty() {
            tags.push(self.breed.clone());
        }
        tags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrder {
    Trending,
    Recent,
}

#[derive(Clone)]
pub struct PostBoard<S> {
    store: S,
    posts: Vec<Post>,
    liked: Vec<String>,
    bookmarked: Vec<String>,
    comments: BTreeMap<String, Vec<String>>,
}

impl<S: StateStore> PostBoard<S> {
    pub fn load(store: S) -> Self {
        let posts = load_or(&store, POSTS_KEY, sample_posts);
        let liked = load_or(&store, LIKED_POSTS_KEY, Vec::new);
        let bookmarked = load_or(&store, BOOKMARKED_POSTS_KEY, || vec!["2".to_string()]);
        let comments = load_or(&store, POST_COMMENTS_KEY, BTreeMap::new);
        Self {
            store,
            posts,
            liked,
            bookmarked,
            comments,
        }
    }

    /// Posts with the liked/bookmarked lists folded into their flags.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.iter().map(|post| self.decorate(post)).collect()
    }

    pub fn feed(&self, order: FeedOrder) -> Vec<Post> {
        let mut posts = self.posts();
        sort_feed(&mut posts, order);
        posts
    }

    pub fn find(&self, id: &str) -> Option<Post> {
        self.posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| self.decorate(post))
    }

    pub fn add_post(&mut self, draft: &PostDraft) -> Result<Post, DraftError> {
        draft.validate()?;
        let post = Post {
            id: (self.posts.len() + 1).to_string(),
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            tags: draft.tags(),
            pet_type: draft.breed.clone(),
            likes_count: 0,
            comments_count: 0,
            time_since: "just now".to_string(),
            is_liked: false,
            is_bookmarked: false,
        };
        self.posts.insert(0, post.clone());
        persist(&self.store, POSTS_KEY, &self.posts);
        debug!("Added post '{}'", post.id);
        Ok(post)
    }

    pub fn toggle_like(&mut self, id: &str) {
        toggle(&mut self.liked, id);
        persist(&self.store, LIKED_POSTS_KEY, &self.liked);
    }

    pub fn toggle_bookmark(&mut self, id: &str) {
        toggle(&mut self.bookmarked, id);
        persist(&self.store, BOOKMARKED_POSTS_KEY, &self.bookmarked);
    }

    pub fn comments(&self, post_id: &str) -> &[String] {
        self.comments.get(post_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Comments added on this device, keyed by post id.
    pub fn comment_threads(&self) -> BTreeMap<String, Vec<String>> {
        self.comments.clone()
    }

    /// Appends a trimmed comment to a known post. Blank text is ignored.
    pub fn add_comment(&mut self, post_id: &str, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || !self.posts.iter().any(|post| post.id == post_id) {
            return None;
        }
        self.comments
            .entry(post_id.to_string())
            .or_default()
            .push(text.to_string());
        persist(&self.store, POST_COMMENTS_KEY, &self.comments);
        Some(text.to_string())
    }

    fn decorate(&self, post: &Post) -> Post {
        let mut post = post.clone();
        post.comments_count += self.comments(&post.id).len() as u32;
        post.is_liked = post.is_liked || self.liked.contains(&post.id);
        post.is_bookmarked = post.is_bookmarked || self.bookmarked.contains(&post.id);
        post
    }
}

/// Trending puts the most liked first; recent keeps display order.
pub fn sort_feed(posts: &mut [Post], order: FeedOrder) {
    if order == FeedOrder::Trending {
        posts.sort_by_key(|post| Reverse(post.likes_count));
    }
}

fn toggle(ids: &mut Vec<String>, id: &str) {
    if let Some(index) = ids.iter().position(|existing| existing == id) {
        ids.remove(index);
    } else {
        ids.push(id.to_string());
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_post(
    id: &str,
    title: &str,
    content: &str,
    tags: &[&str],
    pet_type: &str,
    counts: (u32, u32),
    time_since: &str,
    flags: (bool, bool),
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        pet_type: pet_type.to_string(),
        likes_count: counts.0,
        comments_count: counts.1,
        time_since: time_since.to_string(),
        is_liked: flags.0,
        is_bookmarked: flags.1,
    }
}

pub fn sample_posts() -> Vec<Post> {
    vec![
        sample_post(
            "1",
            "How do I stop my dog from barking at strangers?",
            "My 2-year-old Beagle barks excessively whenever someone new comes to our house. We've tried treats and distraction but nothing seems to work. Any advice from experienced owners?",
            &["training", "behavior", "barking"],
            "Beagle",
            (24, 7),
            "2h ago",
            (false, false),
        ),
        sample_post(
            "2",
            "Best food for a German Shepherd with sensitive stomach?",
            "My German Shepherd has developed some digestive issues and I'm looking for food recommendations. He's 4 years old and quite active.",
            &["nutrition", "health", "germanshepherd"],
            "German Shepherd",
            (18, 12),
            "5h ago",
            (true, true),
        ),
        sample_post(
            "3",
            "Introducing a new puppy to my older dog",
            "I'm getting a new Labrador puppy next week and I already have a 7-year-old Retriever at home. Any tips on how to make the introduction go smoothly and avoid jealousy?",
            &["puppies", "multipledog", "training"],
            "Labrador",
            (32, 15),
            "1d ago",
            (false, false),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn draft(title: &str, content: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            breed: "Corgi".to_string(),
            categories: vec!["Training".to_string()],
        }
    }

    #[test]
    fn empty_store_loads_samples_and_default_bookmark() {
        let board = PostBoard::load(MemoryStore::new());
        let posts = board.posts();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().find(|p| p.id == "2").unwrap().is_bookmarked);
        assert!(!posts.iter().find(|p| p.id == "1").unwrap().is_bookmarked);
    }

    #[test]
    fn added_post_goes_first_and_persists() {
        let store = MemoryStore::new();
        let mut board = PostBoard::load(store.clone());
        let post = board.add_post(&draft(" Walks ", "Where to walk?")).unwrap();

        assert_eq!(post.id, "4");
        assert_eq!(post.title, "Walks");
        assert_eq!(post.tags, vec!["Training".to_string(), "Corgi".to_string()]);
        assert_eq!(post.time_since, "just now");
        assert_eq!(board.posts()[0].id, "4");

        let reloaded = PostBoard::load(store);
        assert_eq!(reloaded.posts().len(), 4);
        assert_eq!(reloaded.find("4").map(|p| p.pet_type), Some("Corgi".to_string()));
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut board = PostBoard::load(MemoryStore::new());
        assert_eq!(
            board.add_post(&draft("   ", "body")),
            Err(DraftError::MissingTitle)
        );
        assert_eq!(
            board.add_post(&draft("title", "\n")),
            Err(DraftError::MissingContent)
        );
        assert_eq!(board.posts().len(), 3);
    }

    #[test]
    fn like_toggles_and_survives_reload() {
        let store = MemoryStore::new();
        let mut board = PostBoard::load(store.clone());
        board.toggle_like("1");
        assert!(board.find("1").unwrap().is_liked);
        assert_eq!(store.raw(LIKED_POSTS_KEY).as_deref(), Some("[\"1\"]"));

        let mut reloaded = PostBoard::load(store);
        assert!(reloaded.find("1").unwrap().is_liked);
        reloaded.toggle_like("1");
        assert!(!reloaded.find("1").unwrap().is_liked);
    }

    #[test]
    fn stored_flag_wins_over_list_membership() {
        let mut board = PostBoard::load(MemoryStore::new());
        board.toggle_bookmark("2");
        // post 2 ships bookmarked; removing it from the list does not clear the flag
        assert!(board.find("2").unwrap().is_bookmarked);
    }

    #[test]
    fn trending_sorts_by_likes() {
        let board = PostBoard::load(MemoryStore::new());
        let ids: Vec<String> = board
            .feed(FeedOrder::Trending)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        let recent: Vec<String> = board
            .feed(FeedOrder::Recent)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(recent, vec!["1", "2", "3"]);
    }

    #[test]
    fn comments_skip_blank_text_and_persist() {
        let store = MemoryStore::new();
        let mut board = PostBoard::load(store.clone());
        assert_eq!(board.add_comment("1", "   "), None);
        assert_eq!(board.add_comment("99", "hello"), None);
        assert_eq!(
            board.add_comment("1", "  Try a long walk first "),
            Some("Try a long walk first".to_string())
        );
        board.add_comment("1", "Treats help");

        assert_eq!(board.comments("1"), ["Try a long walk first", "Treats help"]);
        assert!(board.comments("2").is_empty());
        assert_eq!(board.find("1").unwrap().comments_count, 9);

        let reloaded = PostBoard::load(store);
        assert_eq!(reloaded.comments("1").len(), 2);
    }

    #[test]
    fn draft_categories_toggle() {
        let mut draft = PostDraft::default();
        draft.toggle_category("Food");
        draft.toggle_category("Exercise");
        draft.toggle_category("Food");
        assert_eq!(draft.tags(), vec!["Exercise".to_string()]);
    }
}
