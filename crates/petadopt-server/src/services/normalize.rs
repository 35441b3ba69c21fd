//! Backend listing → canonical [`PetRecord`].
//!
//! The backend never reports gender or size, so both are drawn from the
//! caller's RNG. Batches seed it from each record's id, which keeps a listing's
//! traits the same across fetches.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{BackendPet, BackendPrice, Gender, PetRecord, Size, Species};

pub const UNKNOWN_PLACE: &str = "Necunoscut";
pub const UNKNOWN_BREED: &str = "Necunoscut";
pub const UNKNOWN_AGE: &str = "Necunoscută";
pub const UNNAMED: &str = "Animal fără nume";
pub const NO_DESCRIPTION: &str = "Fără descriere";
pub const PLACEHOLDER_IMAGE: &str = "/images/pet-placeholder.jpg";
pub const SOURCE_SITE: &str = "animalutul.ro";
pub const SOURCE_LINK: &str = "https://www.animalutul.ro";
pub const DEFAULT_CATEGORY: &str = "Altele";

/// Listing date as the site displays it.
pub fn today() -> String {
    chrono::Local::now().format("%d.%m.%Y").to_string()
}

pub fn species_for_category(category: Option<&str>) -> Species {
    let Some(category) = category else {
        return Species::Other;
    };
    let lower = category.to_lowercase();

    if category == "Caini" || lower.contains("câini") || lower.contains("caini") {
        Species::Dog
    } else if category == "Pisici" || lower.contains("pisici") {
        Species::Cat
    } else {
        Species::Other
    }
}

pub fn location(city: Option<&str>, county: Option<&str>) -> String {
    match (city, county) {
        (Some(city), Some(county)) => format!("{city}, {county}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => UNKNOWN_PLACE.to_string(),
    }
}

pub fn normalize<R: Rng + ?Sized>(raw: BackendPet, rng: &mut R, posted_date: &str) -> PetRecord {
    let id = record_id(&raw);
    let city = present(raw.city);
    let county = present(raw.county);
    let category = present(raw.category);
    let subcategory = present(raw.subcategory);

    let gender = *Gender::ALL.choose(rng).unwrap_or(&Gender::Male);
    let size = *Size::ALL.choose(rng).unwrap_or(&Size::Medium);

    let price = raw
        .price
        .and_then(BackendPrice::amount)
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
        .max(0.0);

    PetRecord {
        id,
        name: present(raw.title).unwrap_or_else(|| UNNAMED.to_string()),
        species: species_for_category(category.as_deref()),
        breed: present(raw.breed)
            .or_else(|| subcategory.clone())
            .unwrap_or_else(|| UNKNOWN_BREED.to_string()),
        age: UNKNOWN_AGE.to_string(),
        image_url: present(raw.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        description: present(raw.description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        source: SOURCE_SITE.to_string(),
        original_link: present(raw.link).unwrap_or_else(|| SOURCE_LINK.to_string()),
        location: location(city.as_deref(), county.as_deref()),
        gender,
        size,
        posted_date: posted_date.to_string(),
        price,
        category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        subcategory,
        promoted: raw.promoted.unwrap_or(false),
        county_raw: county.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        city_raw: city.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        service_type: present(raw.service),
    }
}

/// The backend's id, or a digest of link and title when the store strips ids.
/// Only a record with neither gets a random id.
pub fn record_id(raw: &BackendPet) -> String {
    if let Some(id) = present(raw.id.clone()) {
        return id;
    }

    let link = present(raw.link.clone());
    let title = present(raw.title.clone());
    if link.is_none() && title.is_none() {
        return Uuid::new_v4().to_string();
    }

    let digest = Sha256::new()
        .chain_update(link.unwrap_or_default())
        .chain_update([0u8])
        .chain_update(title.unwrap_or_default())
        .finalize();
    hex::encode(&digest[..12])
}

fn trait_seed(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(seed)
}

/// Normalize a whole response, seeding each record's traits from its id.
pub fn normalize_batch(raw: Vec<BackendPet>) -> Vec<PetRecord> {
    let date = today();
    raw.into_iter()
        .map(|mut pet| {
            let id = record_id(&pet);
            let mut rng = StdRng::seed_from_u64(trait_seed(&id));
            pet.id = Some(id);
            normalize(pet, &mut rng, &date)
        })
        .collect()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
