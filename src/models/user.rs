use serde::{Deserialize, Serialize};

use super::{first_id, first_text, lenient, RawId, NOT_AVAILABLE};
use crate::text::fold;

/// Portal role. Anything not recognisably an organizer is a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Visitor,
    Organizer,
}

impl Role {
    /// Case-insensitive parse tolerant of prefixes like `ROLE_ORGANIZER` and French labels.
    pub fn parse(value: &str) -> Self {
        let folded = fold(value);
        if folded.contains("organizer") || folded.contains("organisateur") {
            Role::Organizer
        } else {
            Role::Visitor
        }
    }
}

/// User object as the backend returns it, alone or nested in reservations and events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "_id")]
    pub object_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "full_name")]
    pub full_name_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "first_name")]
    pub first_name_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub prenom: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "last_name")]
    pub last_name_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub nom: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub telephone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
}

impl RawUser {
    pub fn id(&self) -> Option<String> {
        first_id([&self.id, &self.object_id])
    }

    /// Display name: explicit name first, then first + last name.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = first_text([&self.name, &self.full_name, &self.full_name_snake]) {
            return Some(name);
        }
        let parts: Vec<String> = [
            first_text([&self.first_name, &self.first_name_snake, &self.prenom]),
            first_text([&self.last_name, &self.last_name_snake, &self.nom]),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    pub fn phone(&self) -> Option<String> {
        first_text([&self.phone, &self.phone_number, &self.telephone])
    }
}

/// A user reference: either the nested object or just its id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUserRef {
    Object(RawUser),
    Id(RawId),
}

/// Canonical user, as returned by `/users/me`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl User {
    pub fn from_raw(raw: RawUser) -> Self {
        let name = raw
            .display_name()
            .unwrap_or_else(|| crate::normalize::FALLBACK_USER_NAME.to_string());
        User {
            id: raw.id().unwrap_or_default(),
            name,
            email: first_text([&raw.email]).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: raw.phone(),
            role: raw.role.as_deref().map(Role::parse).unwrap_or_default(),
        }
    }
}
