//! Read-only views computed from a loaded profile.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ProfileError, Result};
use crate::profile::{Profile, Project};

#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct SkillProjects {
    pub skill: String,
    pub count: usize,
    pub projects: Vec<Project>,
}

#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct NameMatch {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

#[derive(Serialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub name_match: Vec<NameMatch>,
    pub skills_match: Vec<String>,
    pub projects_match: Vec<Project>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.name_match.is_empty()
            && self.skills_match.is_empty()
            && self.projects_match.is_empty()
    }
}

/// Projects with a tech stack entry equal to `skill`, ignoring case.
///
/// This is whole-entry equality, so `"Reac"` does not match `"React"`.
pub fn projects_by_skill(profile: &Profile, skill: &str) -> Result<SkillProjects> {
    if skill.is_empty() {
        return Err(ProfileError::BadRequest(
            "Skill query parameter is required".to_string(),
        ));
    }

    let wanted = skill.to_lowercase();
    let projects: Vec<Project> = profile
        .projects
        .iter()
        .filter(|project| {
            project
                .tech_stack
                .iter()
                .any(|tech| tech.to_lowercase() == wanted)
        })
        .cloned()
        .collect();

    Ok(SkillProjects {
        skill: skill.to_string(),
        count: projects.len(),
        projects,
    })
}

/// Counts tech stack entries across all projects, most used first.
///
/// Entries are compared as exact strings. Equal counts keep the order in
/// which each skill first appears.
pub fn top_skills(profile: &Profile) -> Vec<SkillCount> {
    let mut counts: Vec<SkillCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tech in profile.projects.iter().flat_map(|p| p.tech_stack.iter()) {
        match index.get(tech.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tech.as_str(), counts.len());
                counts.push(SkillCount {
                    skill: tech.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, which keeps the first-appearance tie-break
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Case-insensitive substring search over name, skills and project text.
pub fn search(profile: &Profile, query: &str) -> Result<SearchResults> {
    if query.is_empty() {
        return Err(ProfileError::BadRequest(
            "Search query is required".to_string(),
        ));
    }

    let query = query.to_lowercase();
    let contains = |text: &str| text.to_lowercase().contains(&query);

    let mut results = SearchResults::default();

    if contains(profile.name.as_str()) {
        results.name_match.push(NameMatch {
            kind: "name",
            value: profile.name.clone(),
        });
    }

    results.skills_match = profile
        .skills
        .iter()
        .filter(|skill| contains(skill.as_str()))
        .cloned()
        .collect();

    results.projects_match = profile
        .projects
        .iter()
        .filter(|project| {
            project.title.as_deref().map_or(false, contains)
                || project.description.as_deref().map_or(false, contains)
        })
        .cloned()
        .collect();

    Ok(results)
}
