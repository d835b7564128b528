//! The venue record produced by the extraction pass.

use serde::{Deserialize, Serialize};

/// A single extracted venue listing.
///
/// The `name` field is the record's identity: it is the key the
/// deduplication tracker uses to decide whether a record has already been
/// seen on an earlier page. The extraction layer guarantees every field is
/// populated before a record reaches the crawl loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    /// Venue name (identity field)
    pub name: String,

    /// Price description as shown on the listing
    pub price: String,

    /// Location (city/area text)
    pub location: String,

    /// Guest capacity description
    pub capacity: String,

    /// Aggregate rating
    pub rating: f32,

    /// Review count
    pub reviews: u32,

    /// Short listing description
    pub description: String,
}

impl VenueRecord {
    /// Field names the extraction collaborator must populate.
    pub const REQUIRED_FIELDS: [&'static str; 7] = [
        "name",
        "price",
        "location",
        "capacity",
        "rating",
        "reviews",
        "description",
    ];

    /// The identity string used for cross-page deduplication.
    pub fn identity(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_name() {
        let record = VenueRecord {
            name: "The Grand Hall".to_string(),
            price: "$$".to_string(),
            location: "Atlanta, GA".to_string(),
            capacity: "Up to 300".to_string(),
            rating: 4.8,
            reviews: 212,
            description: "Historic ballroom".to_string(),
        };
        assert_eq!(record.identity(), "The Grand Hall");
    }

    #[test]
    fn deserializes_from_extraction_json() {
        let value = serde_json::json!({
            "name": "Lakeside Terrace",
            "price": "$5,000",
            "location": "Marietta, GA",
            "capacity": "150",
            "rating": 4.2,
            "reviews": 37,
            "description": "Outdoor terrace on the lake"
        });
        let record: VenueRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.reviews, 37);
        assert!((record.rating - 4.2).abs() < f32::EPSILON);
    }
}
