//! Type-specific [`Specifications`] of a [`Property`].
//!
//! Exactly one variant exists per [`Kind`], so an impossible
//! kind/specification combination is unrepresentable and rendering is
//! checked for exhaustiveness at compile time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::Display;

use super::Kind;
#[cfg(doc)]
use super::Property;

/// Type-specific specification subtree of a [`Property`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specifications {
    /// Specifications of an apartment.
    Apartment(Apartment),

    /// Specifications of a villa.
    Villa(Villa),

    /// Specifications of a commercial space.
    Commercial(Commercial),

    /// Specifications of an open plot.
    OpenPlot(OpenPlot),

    /// Specifications of farm land.
    FarmLand(FarmLand),
}

impl Specifications {
    /// Returns the [`Kind`] this [`Specifications`] variant belongs to.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Apartment(_) => Kind::Apartment,
            Self::Villa(_) => Kind::Villa,
            Self::Commercial(_) => Kind::Commercial,
            Self::OpenPlot(_) => Kind::OpenPlot,
            Self::FarmLand(_) => Kind::FarmLand,
        }
    }

    /// Enumerates the populated fields of this [`Specifications`] in
    /// declaration order.
    ///
    /// Absent values, empty strings and empty lists are dropped.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        match self {
            Self::Apartment(s) => s.fields(),
            Self::Villa(s) => s.fields(),
            Self::Commercial(s) => s.fields(),
            Self::OpenPlot(s) => s.fields(),
            Self::FarmLand(s) => s.fields(),
        }
    }
}

/// Single populated specification field.
#[derive(Clone, Debug)]
pub struct Field {
    /// Key of this [`Field`], as declared in its specification shape.
    pub key: &'static str,

    /// [`Value`] of this [`Field`].
    pub value: Value,
}

impl Field {
    /// Creates a new [`Field`] with the provided key and [`Value`].
    fn new(key: &'static str, value: Value) -> Self {
        Self { key, value }
    }
}

/// Value of a specification [`Field`].
#[derive(Clone, Debug)]
pub enum Value {
    /// Free-form (possibly multiline) text.
    Text(String),

    /// Decimal quantity.
    Number(Decimal),

    /// Small integral count.
    Count(u16),

    /// Boolean flag.
    Flag(bool),

    /// Ordered key/value entries.
    Entries(Vec<(String, String)>),

    /// Ordered list of [`Item`]s.
    List(Vec<Item>),
}

/// Element of a [`Value::List`].
#[derive(Clone, Debug)]
pub enum Item {
    /// Plain text element, displayed verbatim.
    Text(String),

    /// Structured element, displayed as a compact JSON dump.
    Structured(serde_json::Value),
}

/// Collector of populated [`Field`]s.
#[derive(Debug, Default)]
struct Fields(Vec<Field>);

impl Fields {
    fn text(&mut self, key: &'static str, value: Option<&String>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.0.push(Field::new(key, Value::Text(v.clone())));
        }
    }

    fn display(&mut self, key: &'static str, value: Option<impl ToString>) {
        if let Some(v) = value {
            self.0.push(Field::new(key, Value::Text(v.to_string())));
        }
    }

    fn number(&mut self, key: &'static str, value: Option<Decimal>) {
        if let Some(v) = value {
            self.0.push(Field::new(key, Value::Number(v)));
        }
    }

    fn count(&mut self, key: &'static str, value: impl Into<Option<u16>>) {
        if let Some(v) = value.into() {
            self.0.push(Field::new(key, Value::Count(v)));
        }
    }

    fn flag(&mut self, key: &'static str, value: Option<bool>) {
        if let Some(v) = value {
            self.0.push(Field::new(key, Value::Flag(v)));
        }
    }

    fn entries(&mut self, key: &'static str, value: &[(String, String)]) {
        if !value.is_empty() {
            self.0
                .push(Field::new(key, Value::Entries(value.to_vec())));
        }
    }

    fn list(&mut self, key: &'static str, value: Vec<Item>) {
        if !value.is_empty() {
            self.0.push(Field::new(key, Value::List(value)));
        }
    }
}

/// Furnishing level of a residential [`Property`].
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "title_case")]
pub enum Furnishing {
    /// Fully furnished.
    Furnished,

    /// Partially furnished.
    SemiFurnished,

    /// Not furnished.
    Unfurnished,
}

/// Compass direction a [`Property`] faces.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "title_case")]
pub enum Facing {
    /// Facing north.
    North,

    /// Facing east.
    East,

    /// Facing south.
    South,

    /// Facing west.
    West,

    /// Facing north-east.
    NorthEast,

    /// Facing north-west.
    NorthWest,

    /// Facing south-east.
    SouthEast,

    /// Facing south-west.
    SouthWest,
}

/// Specifications of an apartment.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Apartment {
    /// Number of bedrooms.
    pub bedrooms: u16,

    /// Number of bathrooms.
    pub bathrooms: u16,

    /// Number of balconies.
    pub balconies: Option<u16>,

    /// Floor the apartment is on.
    pub floor: Option<u16>,

    /// Total number of floors in the building.
    pub total_floors: Option<u16>,

    /// [`Furnishing`] level.
    pub furnishing: Option<Furnishing>,

    /// Direction the main entrance faces.
    pub facing: Option<Facing>,

    /// Whether a parking slot is reserved.
    pub reserved_parking: Option<bool>,

    /// Free-form highlights, one per line.
    pub highlights: Option<String>,
}

impl Apartment {
    /// Enumerates the populated fields of these specifications.
    fn fields(&self) -> Vec<Field> {
        let mut out = Fields::default();
        out.count("bedrooms", self.bedrooms);
        out.count("bathrooms", self.bathrooms);
        out.count("balconies", self.balconies);
        out.count("floor", self.floor);
        out.count("total_floors", self.total_floors);
        out.display("furnishing", self.furnishing);
        out.display("facing", self.facing);
        out.flag("reserved_parking", self.reserved_parking);
        out.text("highlights", self.highlights.as_ref());
        out.0
    }
}

/// Specifications of a villa.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Villa {
    /// Number of bedrooms.
    pub bedrooms: u16,

    /// Number of bathrooms.
    pub bathrooms: u16,

    /// Number of floors.
    pub floors: Option<u16>,

    /// Plot area in square feet.
    pub plot_area_sqft: Option<Decimal>,

    /// Built-up area in square feet.
    pub built_up_area_sqft: Option<Decimal>,

    /// [`Furnishing`] level.
    pub furnishing: Option<Furnishing>,

    /// Direction the main entrance faces.
    pub facing: Option<Facing>,

    /// Whether the villa has a private garden.
    pub private_garden: Option<bool>,

    /// Free-form highlights, one per line.
    pub highlights: Option<String>,
}

impl Villa {
    /// Enumerates the populated fields of these specifications.
    fn fields(&self) -> Vec<Field> {
        let mut out = Fields::default();
        out.count("bedrooms", self.bedrooms);
        out.count("bathrooms", self.bathrooms);
        out.count("floors", self.floors);
        out.number("plot_area_sqft", self.plot_area_sqft);
        out.number("built_up_area_sqft", self.built_up_area_sqft);
        out.display("furnishing", self.furnishing);
        out.display("facing", self.facing);
        out.flag("private_garden", self.private_garden);
        out.text("highlights", self.highlights.as_ref());
        out.0
    }
}

/// Usage a commercial space is suited for.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "title_case")]
pub enum Usage {
    /// Office space.
    Office,

    /// Retail space.
    Retail,

    /// Warehouse or storage.
    Warehouse,

    /// Showroom.
    Showroom,
}

/// Specifications of a commercial space.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Commercial {
    /// [`Usage`] the space is suited for.
    pub usage: Option<Usage>,

    /// Carpet area in square feet.
    pub carpet_area_sqft: Option<Decimal>,

    /// Floor the space is on.
    pub floor: Option<u16>,

    /// Number of washrooms.
    pub washrooms: Option<u16>,

    /// Whether a pantry is available.
    pub pantry: Option<bool>,

    /// Number of parking slots.
    pub parking_slots: Option<u16>,

    /// Recurring charges, as label/amount pairs.
    pub monthly_charges: Vec<(String, String)>,

    /// Free-form highlights, one per line.
    pub highlights: Option<String>,
}

impl Commercial {
    /// Enumerates the populated fields of these specifications.
    fn fields(&self) -> Vec<Field> {
        let mut out = Fields::default();
        out.display("usage", self.usage);
        out.number("carpet_area_sqft", self.carpet_area_sqft);
        out.count("floor", self.floor);
        out.count("washrooms", self.washrooms);
        out.flag("pantry", self.pantry);
        out.count("parking_slots", self.parking_slots);
        out.entries("monthly_charges", &self.monthly_charges);
        out.text("highlights", self.highlights.as_ref());
        out.0
    }
}

/// Specifications of an open plot.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenPlot {
    /// Plot area in square feet.
    pub plot_area_sqft: Option<Decimal>,

    /// Plot dimensions, e.g. `40x60`.
    pub dimensions: Option<String>,

    /// Direction the plot faces.
    pub facing: Option<Facing>,

    /// Whether the plot has a boundary wall.
    pub boundary_wall: Option<bool>,

    /// Whether the plot is a corner plot.
    pub corner_plot: Option<bool>,

    /// Approvals the plot has, e.g. zoning clearances.
    pub approvals: Vec<String>,
}

impl OpenPlot {
    /// Enumerates the populated fields of these specifications.
    fn fields(&self) -> Vec<Field> {
        let mut out = Fields::default();
        out.number("plot_area_sqft", self.plot_area_sqft);
        out.text("dimensions", self.dimensions.as_ref());
        out.display("facing", self.facing);
        out.flag("boundary_wall", self.boundary_wall);
        out.flag("corner_plot", self.corner_plot);
        out.list(
            "approvals",
            self.approvals.iter().cloned().map(Item::Text).collect(),
        );
        out.0
    }
}

/// Crop cultivated on farm land.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    /// Name of the crop.
    pub name: String,

    /// Season the crop is cultivated in, if seasonal.
    pub season: Option<String>,
}

/// Specifications of farm land.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FarmLand {
    /// Land area in acres.
    pub land_area_acres: Option<Decimal>,

    /// Predominant soil type.
    pub soil_type: Option<String>,

    /// Available water sources.
    pub water_sources: Vec<String>,

    /// Whether the land is fenced.
    pub fenced: Option<bool>,

    /// [`Crop`]s cultivated on the land.
    pub crops: Vec<Crop>,

    /// Distance to the nearest road in kilometers.
    pub road_distance_km: Option<Decimal>,
}

impl FarmLand {
    /// Enumerates the populated fields of these specifications.
    fn fields(&self) -> Vec<Field> {
        let mut out = Fields::default();
        out.number("land_area_acres", self.land_area_acres);
        out.text("soil_type", self.soil_type.as_ref());
        out.list(
            "water_sources",
            self.water_sources.iter().cloned().map(Item::Text).collect(),
        );
        out.flag("fenced", self.fenced);
        out.list(
            "crops",
            self.crops
                .iter()
                .map(|c| {
                    Item::Structured(json!({
                        "name": c.name,
                        "season": c.season,
                    }))
                })
                .collect(),
        );
        out.number("road_distance_km", self.road_distance_km);
        out.0
    }
}
