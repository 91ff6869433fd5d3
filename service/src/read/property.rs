//! [`Property`]-related read definitions.
//!
//! Houses the specification resolver: a pure, total function turning the
//! type-specific specification subtree of a [`Property`] into labelled
//! bullet groups ready for display.

use crate::domain::{
    property::specifications::{Item, Value},
    Amenity, Property,
};

use super::agent;

/// [`Property`] with its assignment expanded into [`agent::Summary`]s.
///
/// Result of an assignment operation. IDs of the assignment that do not
/// resolve to an existing agent produce no summary.
#[derive(Clone, Debug)]
pub struct Assigned {
    /// The [`Property`] after reconciliation.
    pub property: Property,

    /// Summaries of the assigned agents that resolved.
    pub agents: Vec<agent::Summary>,
}

/// [`Property`] prepared for display.
#[derive(Clone, Debug)]
pub struct Listing {
    /// The [`Property`] itself.
    pub property: Property,

    /// [`Amenity`] records the property's reference list resolved to.
    ///
    /// Dangling references resolve to nothing and are omitted.
    pub amenities: Vec<Amenity>,

    /// Rendered [`Specifications`] of the [`Property`].
    pub specifications: Specifications,
}

/// Rendered specifications of a [`Property`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Specifications {
    /// No specifications are available for the [`Property`].
    ///
    /// Produced when the subtree is absent, or when it does not match the
    /// property's declared kind. Explicitly not an error.
    Unavailable,

    /// Ordered display [`Group`]s.
    Groups(Vec<Group>),
}

/// Single rendered specification field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Group {
    /// Raw field key.
    pub key: String,

    /// Human-readable label derived from the key.
    pub label: String,

    /// Display bullets of the field's value.
    pub bullets: Vec<String>,
}

/// Renders the [`Specifications`] of the given [`Property`].
///
/// Pure and total over all property kinds plus the no-data case.
#[must_use]
pub fn specifications(property: &Property) -> Specifications {
    let Some(specs) = &property.specifications else {
        return Specifications::Unavailable;
    };
    if specs.kind() != property.kind {
        // A mismatched subtree is treated the same as a missing one.
        return Specifications::Unavailable;
    }

    Specifications::Groups(
        specs
            .fields()
            .into_iter()
            .map(|field| Group {
                key: field.key.to_owned(),
                label: label(field.key),
                bullets: bullets(&field.value),
            })
            .collect(),
    )
}

/// Derives a human-readable label from a field key.
///
/// Underscores become spaces, interior capitals get a space inserted before
/// them, and every word is title-cased.
#[must_use]
pub fn label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c == '_' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && !spaced.is_empty() && !spaced.ends_with(' ')
            {
                spaced.push(' ');
            }
            spaced.push(c);
        }
    }

    let mut out = String::with_capacity(spaced.len());
    for word in spaced.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Renders a field [`Value`] into display bullets.
fn bullets(value: &Value) -> Vec<String> {
    match value {
        Value::Text(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Count(n) => vec![n.to_string()],
        Value::Flag(b) => vec![b.to_string()],
        Value::Entries(entries) => entries
            .iter()
            .map(|(key, value)| format!("{}: {value}", label(key)))
            .collect(),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Item::Text(text) => text.clone(),
                Item::Structured(value) => value.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{
        property::{
            self,
            specifications::{Apartment, Crop, FarmLand, Furnishing, Villa},
        },
        Property,
    };

    use super::{label, specifications, Specifications};

    fn property(
        kind: property::Kind,
        specs: Option<property::Specifications>,
    ) -> Property {
        Property {
            id: property::Id::new(),
            title: "Test listing".parse().unwrap(),
            city: "Hyderabad".parse().unwrap(),
            address: None,
            kind,
            price: None,
            area: None,
            price_per_sqft: None,
            specifications: specs,
            assigned_agents: Vec::new(),
            amenities: Vec::new(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn derives_labels_from_keys() {
        assert_eq!(label("bedrooms"), "Bedrooms");
        assert_eq!(label("built_up_area_sqft"), "Built Up Area Sqft");
        assert_eq!(label("pricePerSqft"), "Price Per Sqft");
        assert_eq!(label("reserved_parking"), "Reserved Parking");
    }

    #[test]
    fn absent_subtree_renders_unavailable() {
        let prop = property(property::Kind::Villa, None);
        assert_eq!(specifications(&prop), Specifications::Unavailable);
    }

    #[test]
    fn mismatched_subtree_renders_unavailable() {
        let prop = property(
            property::Kind::Villa,
            Some(property::Specifications::Apartment(Apartment {
                bedrooms: 2,
                bathrooms: 1,
                ..Apartment::default()
            })),
        );
        assert_eq!(specifications(&prop), Specifications::Unavailable);
    }

    #[test]
    fn renders_counts_flags_and_multiline_text() {
        let prop = property(
            property::Kind::Apartment,
            Some(property::Specifications::Apartment(Apartment {
                bedrooms: 3,
                bathrooms: 2,
                furnishing: Some(Furnishing::SemiFurnished),
                reserved_parking: Some(true),
                highlights: Some(
                    "Corner unit\n\n  Near metro station  \n".to_owned(),
                ),
                ..Apartment::default()
            })),
        );

        let Specifications::Groups(groups) = specifications(&prop) else {
            panic!("expected rendered groups");
        };

        let keys = groups.iter().map(|g| g.key.as_str()).collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                "bedrooms",
                "bathrooms",
                "furnishing",
                "reserved_parking",
                "highlights",
            ],
        );

        let by_key = |key: &str| {
            groups.iter().find(|g| g.key == key).unwrap_or_else(|| {
                panic!("missing group `{key}`");
            })
        };

        assert_eq!(by_key("bedrooms").bullets, ["3"]);
        assert_eq!(by_key("furnishing").bullets, ["Semi Furnished"]);
        assert_eq!(by_key("reserved_parking").bullets, ["true"]);
        assert_eq!(by_key("reserved_parking").label, "Reserved Parking");
        assert_eq!(
            by_key("highlights").bullets,
            ["Corner unit", "Near metro station"],
        );
    }

    #[test]
    fn renders_lists_with_structured_dumps() {
        let prop = property(
            property::Kind::FarmLand,
            Some(property::Specifications::FarmLand(FarmLand {
                water_sources: vec!["Borewell".to_owned(), "Canal".to_owned()],
                crops: vec![Crop {
                    name: "Paddy".to_owned(),
                    season: Some("Kharif".to_owned()),
                }],
                ..FarmLand::default()
            })),
        );

        let Specifications::Groups(groups) = specifications(&prop) else {
            panic!("expected rendered groups");
        };

        let sources = groups.iter().find(|g| g.key == "water_sources").unwrap();
        assert_eq!(sources.bullets, ["Borewell", "Canal"]);

        let crops = groups.iter().find(|g| g.key == "crops").unwrap();
        assert_eq!(
            crops.bullets,
            [r#"{"name":"Paddy","season":"Kharif"}"#],
        );
    }

    #[test]
    fn drops_empty_fields() {
        let prop = property(
            property::Kind::Villa,
            Some(property::Specifications::Villa(Villa {
                bedrooms: 4,
                bathrooms: 3,
                highlights: Some(String::new()),
                ..Villa::default()
            })),
        );

        let Specifications::Groups(groups) = specifications(&prop) else {
            panic!("expected rendered groups");
        };
        assert!(groups.iter().all(|g| g.key != "highlights"));
        assert!(groups.iter().all(|g| g.key != "plot_area_sqft"));
    }
}
