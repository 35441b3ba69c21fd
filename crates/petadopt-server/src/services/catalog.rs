//! Filtering and pagination over an in-memory listing.
//!
//! Everything here is a pure function of its inputs: the same records,
//! filters, query and page always produce the same view.

use serde::{Deserialize, Serialize, Serializer};

use crate::models::{Gender, PetRecord, Size, Species};

pub const PAGE_SIZE: usize = 30;
const WINDOW_DELTA: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "under-500")]
    Under500,
    #[serde(rename = "500-1000")]
    From500To1000,
    #[serde(rename = "1000-2000")]
    From1000To2000,
    #[serde(rename = "over-2000")]
    Over2000,
}

impl PriceBucket {
    pub fn contains(self, price: f64) -> bool {
        match self {
            PriceBucket::Under500 => price < 500.0,
            PriceBucket::From500To1000 => (500.0..1000.0).contains(&price),
            PriceBucket::From1000To2000 => (1000.0..=2000.0).contains(&price),
            PriceBucket::Over2000 => price > 2000.0,
        }
    }
}

/// Selected filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub species: Option<Species>,
    pub gender: Option<Gender>,
    pub size: Option<Size>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price: Option<PriceBucket>,
    pub promoted: Option<bool>,
}

impl FilterState {
    pub fn matches(&self, pet: &PetRecord) -> bool {
        self.species.map_or(true, |s| pet.species == s)
            && self.gender.map_or(true, |g| pet.gender == g)
            && self.size.map_or(true, |s| pet.size == s)
            && self
                .location
                .as_deref()
                .map_or(true, |l| pet.location == l || pet.county_raw == l)
            && self.category.as_deref().map_or(true, |c| pet.category == c)
            && self.price.map_or(true, |b| b.contains(pet.price))
            && self.promoted.map_or(true, |p| pet.promoted == p)
    }
}

fn matches_query(pet: &PetRecord, needle: &str) -> bool {
    [
        Some(pet.name.as_str()),
        Some(pet.breed.as_str()),
        Some(pet.location.as_str()),
        Some(pet.description.as_str()),
        pet.subcategory.as_deref(),
        pet.service_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Records that pass every filter and, for a non-blank query, mention it in
/// at least one searchable field. Input order is kept.
pub fn apply(records: &[PetRecord], filters: &FilterState, query: &str) -> Vec<PetRecord> {
    let needle = query.trim().to_lowercase();

    records
        .iter()
        .filter(|pet| filters.matches(pet))
        .filter(|pet| needle.is_empty() || matches_query(pet, &needle))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<PetRecord>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Page `page_number` (1-based). Page 0 and pages past the end are empty.
pub fn paginate(records: &[PetRecord], page_size: usize, page_number: usize) -> Page {
    let total_items = records.len();
    let total_pages = total_pages(total_items, page_size);

    let items = if page_number == 0 || page_number > total_pages {
        Vec::new()
    } else {
        let start = (page_number - 1) * page_size;
        let end = (start + page_size).min(total_items);
        records[start..end].to_vec()
    };

    Page {
        items,
        page: page_number,
        page_size,
        total_items,
        total_pages,
    }
}

/// What the browse view is showing. Changing the filters or the query sends
/// the view back to the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    pub filters: FilterState,
    pub query: String,
    pub page: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            query: String::new(),
            page: 1,
        }
    }
}

impl BrowseState {
    pub fn with_filters(self, filters: FilterState) -> Self {
        Self {
            filters,
            page: 1,
            ..self
        }
    }

    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            ..self
        }
    }

    pub fn go_to_page(self, page: usize, total_pages: usize) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
            ..self
        }
    }

    pub fn view(&self, records: &[PetRecord], page_size: usize) -> Page {
        let filtered = apply(records, &self.filters, &self.query);
        paginate(&filtered, page_size, self.page)
    }
}

/// One entry of a pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

impl Serialize for PageLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageLink::Page(n) => serializer.serialize_u64(*n as u64),
            PageLink::Gap => serializer.serialize_str("..."),
        }
    }
}

/// First page, the pages around `current`, last page, with gaps between.
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    match total {
        0 => return Vec::new(),
        1 => return vec![PageLink::Page(1)],
        _ => {}
    }

    let mut links = vec![PageLink::Page(1)];
    if current > WINDOW_DELTA + 2 {
        links.push(PageLink::Gap);
    }

    let lo = current.saturating_sub(WINDOW_DELTA).max(2);
    let hi = (current + WINDOW_DELTA).min(total - 1);
    links.extend((lo..=hi).map(PageLink::Page));

    if current + WINDOW_DELTA < total - 1 {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(total));

    links
}
