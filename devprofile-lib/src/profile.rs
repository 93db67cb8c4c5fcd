use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The one profile record the service manages.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub links: Links,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct Education {
    pub college: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub tech_stack: Vec<String>,
    pub github: Option<String>,
    pub live: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct Links {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

/// JSON `null` reads as an empty list. Stored bincode records always carry a
/// list, and bincode cannot tell `null` apart without a tag.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    if deserializer.is_human_readable() {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
    } else {
        Vec::deserialize(deserializer)
    }
}

/// User-supplied profile fields, used for both create and update.
///
/// Every field is optional so the same shape serves as a partial update.
/// `id`, `createdAt` and `updatedAt` are not part of it; if a client sends
/// them they are ignored.
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub education: Option<Vec<Education>>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<Project>>,
    pub links: Option<Links>,
}

impl Profile {
    /// Builds a fresh record from input fields, filling defaults for
    /// anything omitted. Nothing is validated here.
    pub fn from_fields(fields: ProfileFields, now: DateTime<Utc>) -> Self {
        let mut profile = Profile {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            email: String::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            links: Links::default(),
            created_at: now,
            updated_at: now,
        };
        profile.apply(fields);
        profile
    }

    /// Overwrites each top-level field present in `fields`. Nested lists are
    /// replaced wholesale, never merged.
    pub fn apply(&mut self, fields: ProfileFields) {
        let ProfileFields {
            name,
            email,
            education,
            skills,
            projects,
            links,
        } = fields;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(education) = education {
            self.education = education;
        }
        if let Some(skills) = skills {
            self.skills = skills;
        }
        if let Some(projects) = projects {
            self.projects = projects;
        }
        if let Some(links) = links {
            self.links = links;
        }
    }

    /// Trims the name and lowercases the email, as stored.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.to_lowercase();
    }
}
