//! Synthetic business data for bulk ingestion.

use rand::{seq::SliceRandom, Rng};

use crate::domain::models::NewBusiness;

pub const BUSINESS_TYPES: [&str; 3] = ["type1", "type2", "type3"];

const ADJECTIVES: &[&str] = &[
    "Amber", "Brisk", "Clever", "Dapper", "Eager", "Fuzzy", "Giddy", "Hollow", "Jolly", "Lucky",
    "Mellow", "Nimble", "Plucky", "Quirky", "Rusty", "Snappy", "Tidy", "Witty", "Zesty", "Bold",
];

const NOUNS: &[&str] = &[
    "Badger", "Bakery", "Canyon", "Dolphin", "Falcon", "Garden", "Harbor", "Kettle", "Lantern",
    "Meadow", "Otter", "Pepper", "Quarry", "Rocket", "Saddle", "Teapot", "Walrus", "Willow",
];

const SUFFIXES: &[&str] = &["Co", "Group", "Works", "Studio", "Supply", "Labs", "Traders"];

const WORDS: &[&str] = &[
    "quality", "service", "local", "family", "owned", "since", "serving", "community", "fresh",
    "trusted", "craft", "daily", "friendly", "modern", "classic", "goods", "repairs", "delivery",
    "premium", "affordable", "seasonal", "handmade", "experts", "open", "weekends", "and", "the",
];

const STREETS: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Lake", "Hill", "Park", "River", "Sunset",
];

const STREET_KINDS: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Way"];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Fairview", "Greenville", "Madison", "Georgetown", "Franklin",
    "Clinton", "Salem", "Ashland",
];

/// Generates `count` businesses with a random name, paragraph, address and type.
///
/// Status and worker label are left empty; workers stamp their label before insert.
pub fn generate_businesses<R: Rng>(rng: &mut R, count: usize) -> Vec<NewBusiness> {
    (0..count).map(|_| generate_business(rng)).collect()
}

pub fn generate_business<R: Rng>(rng: &mut R) -> NewBusiness {
    NewBusiness {
        name: silly_name(rng),
        description: paragraph(rng),
        address: address(rng),
        business_type: pick(rng, &BUSINESS_TYPES).to_string(),
        status: String::new(),
        worker_name: String::new(),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words.choose(rng).copied().unwrap_or_default()
}

fn silly_name<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(rng, ADJECTIVES),
        pick(rng, NOUNS),
        pick(rng, SUFFIXES)
    )
}

fn paragraph<R: Rng>(rng: &mut R) -> String {
    let sentences = rng.gen_range(2..=4);
    (0..sentences)
        .map(|_| {
            let len = rng.gen_range(5..=12);
            let words: Vec<&str> = (0..len).map(|_| pick(rng, WORDS)).collect();
            let mut sentence = words.join(" ");
            if let Some(first) = sentence.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            sentence.push('.');
            sentence
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn address<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}, {} {:05}",
        rng.gen_range(1..=9999),
        pick(rng, STREETS),
        pick(rng, STREET_KINDS),
        pick(rng, CITIES),
        rng.gen_range(10000..=99999)
    )
}
