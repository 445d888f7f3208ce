use serde::{Deserialize, Serialize};

use crate::model::Gender;
use crate::storage::{load_or, persist, StateStore, PROFILE_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub pet_name: String,
    pub pet_image: String,
    pub pet_age: u32,
    pub pet_gender: Gender,
    pub pet_breed: String,
    pub owner_name: String,
    pub owner_image: String,
    pub location: String,
    pub bio: String,
    pub interests: Vec<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            pet_name: "Charlie".to_string(),
            pet_image: "https://images.unsplash.com/photo-1543466835-00a7907e9de1".to_string(),
            pet_age: 3,
            pet_gender: Gender::Male,
            pet_breed: "Beagle".to_string(),
            owner_name: "Alex Johnson".to_string(),
            owner_image: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e"
                .to_string(),
            location: "San Francisco, CA".to_string(),
            bio: "Charlie loves playing fetch at the park and meeting new furry friends! He's very friendly and gets along with dogs of all sizes.".to_string(),
            interests: ["Running", "Fetch", "Swimming", "Toys"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub pet_name: Option<String>,
    pub pet_image: Option<String>,
    pub pet_age: Option<u32>,
    pub pet_gender: Option<Gender>,
    pub pet_breed: Option<String>,
    pub owner_name: Option<String>,
    pub owner_image: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl ProfileData {
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(value) = patch.pet_name {
            self.pet_name = value;
        }
        if let Some(value) = patch.pet_image {
            self.pet_image = value;
        }
        if let Some(value) = patch.pet_age {
            self.pet_age = value;
        }
        if let Some(value) = patch.pet_gender {
            self.pet_gender = value;
        }
        if let Some(value) = patch.pet_breed {
            self.pet_breed = value;
        }
        if let Some(value) = patch.owner_name {
            self.owner_name = value;
        }
        if let Some(value) = patch.owner_image {
            self.owner_image = value;
        }
        if let Some(value) = patch.location {
            self.location = value;
        }
        if let Some(value) = patch.bio {
            self.bio = value;
        }
        if let Some(value) = patch.interests {
            self.interests = value;
        }
    }
}

#[derive(Clone)]
pub struct ProfileBook<S> {
    store: S,
    profile: ProfileData,
}

impl<S: StateStore> ProfileBook<S> {
    pub fn load(store: S) -> Self {
        let profile = load_or(&store, PROFILE_KEY, ProfileData::default);
        Self { store, profile }
    }

    pub fn profile(&self) -> &ProfileData {
        &self.profile
    }

    pub fn update(&mut self, patch: ProfilePatch) {
        self.profile.apply(patch);
        persist(&self.store, PROFILE_KEY, &self.profile);
    }
}

/// Splits a comma separated interest list, trimming and dropping blanks.
pub fn parse_interests(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the age field of the edit form; `None` leaves the age untouched.
pub fn parse_age(input: &str) -> Option<u32> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn default_profile_when_nothing_stored() {
        let book = ProfileBook::load(MemoryStore::new());
        assert_eq!(book.profile().pet_name, "Charlie");
        assert_eq!(book.profile().interests.len(), 4);
    }

    #[test]
    fn patch_merges_and_persists() {
        let store = MemoryStore::new();
        let mut book = ProfileBook::load(store.clone());
        book.update(ProfilePatch {
            pet_name: Some("Rex".to_string()),
            pet_age: Some(5),
            ..ProfilePatch::default()
        });

        assert_eq!(book.profile().pet_name, "Rex");
        assert_eq!(book.profile().pet_breed, "Beagle");

        let reloaded = ProfileBook::load(store.clone());
        assert_eq!(reloaded.profile().pet_age, 5);
        assert!(store.raw(PROFILE_KEY).unwrap().contains("\"petName\":\"Rex\""));
    }

    #[test]
    fn interests_are_trimmed() {
        assert_eq!(
            parse_interests(" Running, Fetch ,, Naps "),
            vec!["Running", "Fetch", "Naps"]
        );
        assert!(parse_interests(" , ").is_empty());
    }

    #[test]
    fn invalid_age_is_ignored() {
        assert_eq!(parse_age(" 7 "), Some(7));
        assert_eq!(parse_age("seven"), None);
    }
}
