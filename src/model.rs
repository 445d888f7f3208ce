use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub gender: Option<Gender>,
}

/// A pet profile shown on the swipe deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub images: Vec<String>,
    pub gender: Option<Gender>,
    pub distance_km: f64,
    pub breed: String,
    pub bio: String,
    pub owner: Owner,
    pub likes_count: u32,
}

impl Candidate {
    pub fn image(&self, index: usize) -> Option<&str> {
        self.images.get(index).map(String::as_str)
    }
}

#[allow(clippy::too_many_arguments)]
fn candidate(
    id: &str,
    name: &str,
    images: [&str; 2],
    gender: Gender,
    distance_km: f64,
    breed: &str,
    bio: &str,
    owner: (&str, Gender),
    likes_count: u32,
) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        images: images.iter().map(|url| url.to_string()).collect(),
        gender: Some(gender),
        distance_km,
        breed: breed.to_string(),
        bio: bio.to_string(),
        owner: Owner {
            name: owner.0.to_string(),
            gender: Some(owner.1),
        },
        likes_count,
    }
}

/// Bundled deck used when no backend is configured.
pub fn sample_candidates() -> Vec<Candidate> {
    vec![
        candidate(
            "1",
            "Bella",
            [
                "https://images.unsplash.com/photo-1583511655826-05700442982d",
                "https://images.unsplash.com/photo-1588943211346-0908a1fb0b01",
            ],
            Gender::Female,
            2.4,
            "Golden Retriever",
            "Loves to play fetch and go swimming. Very friendly with other dogs and children.",
            ("Sarah", Gender::Female),
            23,
        ),
        candidate(
            "2",
            "Max",
            [
                "https://images.unsplash.com/photo-1560743641-3914f2c45636",
                "https://images.unsplash.com/photo-1521673461164-de300ebcfb17",
            ],
            Gender::Male,
            4.1,
            "German Shepherd",
            "Energetic and intelligent. Looking for friends to run and play with at the park.",
            ("Mike", Gender::Male),
            18,
        ),
        candidate(
            "3",
            "Luna",
            [
                "https://images.unsplash.com/photo-1511382686815-a9a670f0a512",
                "https://images.unsplash.com/photo-1554692918-08fa0fdc9db3",
            ],
            Gender::Female,
            1.8,
            "Poodle",
            "Elegant and social. Enjoys long walks and playing with toys.",
            ("Emma", Gender::Female),
            15,
        ),
    ]
}
