//! Pet specialists available for paid consultations, with the directory's
//! expand, filter and search state.

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialist {
    pub id: String,
    pub name: String,
    pub image: String,
    pub occupation: Occupation,
    pub experience: u32,
    pub certifications: Vec<String>,
    pub bio: String,
    pub price_per_hour: u32,
    pub consultation_count: u32,
    pub rating: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupation {
    Vet,
    Trainer,
    Groomer,
}

impl Occupation {
    pub const ALL: [Occupation; 3] = [Occupation::Vet, Occupation::Trainer, Occupation::Groomer];

    pub fn label(self) -> &'static str {
        match self {
            Occupation::Vet => "Veterinarian",
            Occupation::Trainer => "Dog Trainer",
            Occupation::Groomer => "Dog Groomer",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Occupation::Vet => "vet",
            Occupation::Trainer => "trainer",
            Occupation::Groomer => "groomer",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|occupation| occupation.key() == key)
    }
}

/// An inclusive numeric band parsed from a filter option: `"6-10"` or `"10+"`.
/// The open-ended form excludes its lower bound, so `"6-10"` and `"10+"` do
/// not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Between(u32, u32),
    Above(u32),
}

impl Band {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(floor) = value.strip_suffix('+') {
            return floor.parse().ok().map(Band::Above);
        }
        let (low, high) = value.split_once('-')?;
        let (low, high) = (low.parse().ok()?, high.parse().ok()?);
        (low <= high).then_some(Band::Between(low, high))
    }

    pub fn contains(self, value: u32) -> bool {
        match self {
            Band::Between(low, high) => (low..=high).contains(&value),
            Band::Above(floor) => value > floor,
        }
    }
}

pub const EXPERIENCE_BANDS: &[(&str, &str)] = &[
    ("0-5", "0-5 years"),
    ("6-10", "6-10 years"),
    ("10+", "10+ years"),
];
pub const PRICE_BANDS: &[(&str, &str)] = &[
    ("0-50", "$0-$50"),
    ("51-100", "$51-$100"),
    ("100+", "$100+"),
];
pub const CONSULTATION_BANDS: &[(&str, &str)] = &[
    ("0-100", "0-100"),
    ("101-500", "101-500"),
    ("500+", "500+"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialistFilter {
    pub occupation: Option<Occupation>,
    pub experience: Option<Band>,
    pub price: Option<Band>,
    pub consultations: Option<Band>,
}

impl SpecialistFilter {
    pub fn matches(&self, specialist: &Specialist) -> bool {
        self.occupation.map_or(true, |o| o == specialist.occupation)
            && self.experience.map_or(true, |b| b.contains(specialist.experience))
            && self.price.map_or(true, |b| b.contains(specialist.price_per_hour))
            && self.consultations.map_or(true, |b| b.contains(specialist.consultation_count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsultationError {
    #[error("no specialist with id '{0}'")]
    UnknownSpecialist(String),
}

/// The directory view: at most one specialist expanded at a time, an optional
/// filter panel, and a free-text search over name and occupation.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    specialists: Vec<Specialist>,
    expanded: Option<String>,
    filters_open: bool,
    filter: SpecialistFilter,
    query: String,
}

impl Directory {
    pub fn new(specialists: Vec<Specialist>) -> Self {
        Self {
            specialists,
            expanded: None,
            filters_open: false,
            filter: SpecialistFilter::default(),
            query: String::new(),
        }
    }

    /// Expands the specialist, or collapses it if it is already expanded.
    pub fn toggle_expanded(&mut self, id: &str) {
        self.expanded = match self.expanded.as_deref() {
            Some(current) if current == id => None,
            _ => Some(id.to_string()),
        };
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.as_deref() == Some(id)
    }

    pub fn toggle_filters(&mut self) {
        self.filters_open = !self.filters_open;
    }

    pub fn filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn filter(&self) -> SpecialistFilter {
        self.filter
    }

    pub fn apply_filter(&mut self, filter: SpecialistFilter) {
        self.filter = filter;
        self.filters_open = false;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible(&self) -> Vec<&Specialist> {
        let needle = self.query.trim().to_lowercase();
        self.specialists
            .iter()
            .filter(|s| self.filter.matches(s))
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.occupation.label().to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn start_consultation(&self, id: &str) -> Result<&Specialist, ConsultationError> {
        let specialist = self
            .specialists
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConsultationError::UnknownSpecialist(id.to_string()))?;
        info!("Starting consultation with {}", specialist.name);
        Ok(specialist)
    }
}

#[allow(clippy::too_many_arguments)]
fn specialist(
    id: &str,
    name: &str,
    image: &str,
    occupation: Occupation,
    experience: u32,
    certifications: &[&str],
    bio: &str,
    price_per_hour: u32,
    consultation_count: u32,
    rating: f32,
) -> Specialist {
    Specialist {
        id: id.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        occupation,
        experience,
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        bio: bio.to_string(),
        price_per_hour,
        consultation_count,
        rating,
    }
}

pub fn sample_specialists() -> Vec<Specialist> {
    vec![
        specialist(
            "1",
            "Dr. Jennifer Wilson",
            "https://images.unsplash.com/photo-1594824476967-48c8b964273f",
            Occupation::Vet,
            8,
            &["DVM", "CVMA"],
            "Specialized in small animal medicine with a focus on preventive care and nutrition. I love helping pet owners understand their furry friends better!",
            80,
            324,
            4.8,
        ),
        specialist(
            "2",
            "Michael Brown",
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e",
            Occupation::Trainer,
            12,
            &["CPDT-KA", "ABCDT"],
            "Professional dog trainer with over a decade of experience. Specializing in behavioral issues, obedience training, and puppy development.",
            60,
            521,
            4.9,
        ),
        specialist(
            "3",
            "Amanda Lee",
            "https://images.unsplash.com/photo-1544005313-94ddf0286df2",
            Occupation::Groomer,
            5,
            &["NDGAA", "IPG"],
            "Certified professional groomer with experience handling all dog breeds. Specializing in breed-specific cuts and working with nervous dogs.",
            45,
            187,
            4.6,
        ),
    ]
}
