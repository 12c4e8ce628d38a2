use serde::{Deserialize, Serialize};

use super::{first_id, first_number, first_text, lenient, RawId, RawNumber};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHighlight {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "image_url")]
    pub image_url_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<u32>,
}

impl RawHighlight {
    pub fn name(&self) -> Option<String> {
        first_text([&self.name, &self.title])
    }

    pub fn image(&self) -> Option<String> {
        first_text([&self.image, &self.image_url, &self.image_url_snake])
    }

    pub fn order(&self) -> Option<u32> {
        self.order.or(self.position)
    }
}

/// Destination record; alternative key spellings are read side by side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDestination {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "_id")]
    pub object_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pays: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub lon: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "image_url")]
    pub image_url_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub highlights: Option<Vec<serde_json::Value>>,
}

impl RawDestination {
    pub fn id(&self) -> Option<String> {
        first_id([&self.id, &self.object_id])
    }

    pub fn name(&self) -> Option<String> {
        first_text([&self.name, &self.title])
    }

    pub fn country(&self) -> Option<String> {
        first_text([&self.country, &self.pays])
    }

    pub fn latitude(&self) -> Option<f64> {
        first_number([&self.latitude, &self.lat])
    }

    pub fn longitude(&self) -> Option<f64> {
        first_number([&self.longitude, &self.lng, &self.lon])
    }

    pub fn image(&self) -> Option<String> {
        first_text([&self.image, &self.image_url, &self.image_url_snake])
    }
}

/// A destination reference inside an event: the nested object or just its id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDestinationRef {
    Object(Box<RawDestination>),
    Id(RawId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

/// Canonical destination with its highlights in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub image: Option<String>,
    pub highlights: Vec<Highlight>,
}
