use crate::models::{Gender, PetRecord, Size, Species};
use crate::services::normalize::{today, SOURCE_LINK, SOURCE_SITE, UNKNOWN_AGE};

struct Sample {
    id: &'static str,
    name: &'static str,
    species: Species,
    breed: &'static str,
    age: &'static str,
    image_url: &'static str,
    description: &'static str,
    city: &'static str,
    county: &'static str,
    gender: Gender,
    size: Size,
    price: f64,
    category: &'static str,
    subcategory: Option<&'static str>,
    promoted: bool,
    service_type: Option<&'static str>,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        id: "1",
        name: "Berbeci și oi cu miei",
        species: Species::Other,
        breed: "Oi",
        age: UNKNOWN_AGE,
        image_url: "https://s3.publi24.ro/vertical-ro-f646bd5a/top/20250325/1938/de7f79efab33a0d2cb57529a2db199aa.jpg",
        description: "Berbeci și oi cu miei, grase și frumoase pentru pretențioși. Prețul stabilit în funcție de greutate.",
        city: "Maciuca",
        county: "Valcea",
        gender: Gender::Male,
        size: Size::Large,
        price: 1000.0,
        category: "Animale de ferma",
        subcategory: Some("Oi"),
        promoted: false,
        service_type: None,
    },
    Sample {
        id: "2",
        name: "Vand porc pt sacrificare",
        species: Species::Other,
        breed: "Porci",
        age: UNKNOWN_AGE,
        image_url: "https://s3.publi24.ro/vertical-ro-f646bd5a/top/20250325/1940/3d9d10b6f.jpg",
        description: "Vand porc crescut in batatura de 200 kg pt sacrificare. Pret - 15 ron kg.",
        city: "Pascani",
        county: "Iasi",
        gender: Gender::Male,
        size: Size::Large,
        price: 15.0,
        category: "Animale de ferma",
        subcategory: Some("Porci"),
        promoted: false,
        service_type: None,
    },
    Sample {
        id: "3",
        name: "pudel roscat",
        species: Species::Dog,
        breed: "pudel",
        age: "2 luni",
        image_url: "https://s3.publi24.ro/vertical-ro-f646bd5a/top/20250412/0848/34b6ce385.jpg",
        description: "catelul pudel mic 2 luni, cu carnet de sănătate, microcip inregistrat la Recom.",
        city: "Cluj-Napoca",
        county: "Cluj",
        gender: Gender::Male,
        size: Size::Small,
        price: 3982.0,
        category: "Caini",
        subcategory: None,
        promoted: true,
        service_type: None,
    },
    // A service listing, so it normalizes to "other" like any "Servicii" record.
    Sample {
        id: "4",
        name: "dresaj de caini",
        species: Species::Other,
        breed: "serviciu",
        age: UNKNOWN_AGE,
        image_url: "https://s3.publi24.ro/vertical-ro-f646bd5a/top/20250123/0953/ee70438e1.jpg",
        description: "cu o experiență de peste 40 ani canisa DE RIBA vă oferă dresaj pentru toate rasele.",
        city: "Dragomiresti-Vale",
        county: "Ilfov",
        gender: Gender::Male,
        size: Size::Medium,
        price: 150.0,
        category: "Servicii",
        subcategory: None,
        promoted: false,
        service_type: Some("dresaj si cosmetica"),
    },
    Sample {
        id: "5",
        name: "British Longhair",
        species: Species::Cat,
        breed: "british shorthair",
        age: "8 săptămâni",
        image_url: "https://s3.publi24.ro/vertical-ro-f646bd5a/top/20250413/1627/dd0f25ca1.jpg",
        description: "Suntem 2 frățiori (baiețel și fetiță) și căutăm o căsuță nouă. Avem 8 săptămâni.",
        city: "Deva",
        county: "Hunedoara",
        gender: Gender::Female,
        size: Size::Small,
        price: 2500.0,
        category: "Pisici",
        subcategory: None,
        promoted: true,
        service_type: None,
    },
];

/// The listings served when the backend cannot be reached.
pub fn fallback_pets() -> Vec<PetRecord> {
    let posted_date = today();

    SAMPLES
        .iter()
        .map(|s| PetRecord {
            id: s.id.to_string(),
            name: s.name.to_string(),
            species: s.species,
            breed: s.breed.to_string(),
            age: s.age.to_string(),
            image_url: s.image_url.to_string(),
            description: s.description.to_string(),
            source: SOURCE_SITE.to_string(),
            original_link: SOURCE_LINK.to_string(),
            location: format!("{}, {}", s.city, s.county),
            gender: s.gender,
            size: s.size,
            posted_date: posted_date.clone(),
            price: s.price,
            category: s.category.to_string(),
            subcategory: s.subcategory.map(str::to_string),
            promoted: s.promoted,
            county_raw: s.county.to_string(),
            city_raw: s.city.to_string(),
            service_type: s.service_type.map(str::to_string),
        })
        .collect()
}
