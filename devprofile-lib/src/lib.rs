//! Profile storage, validation and read-only views for a single developer
//! profile, shared by the HTTP server and the admin CLI.

use std::path::Path;
use tokio::runtime::Runtime;

pub mod db;
pub mod error;
pub mod profile;
pub mod query;
pub mod store;
pub mod validation;

pub use db::{ProfileDb, DB};
pub use error::{ProfileError, Result};
pub use profile::{Education, Links, Profile, ProfileFields, Project};
pub use store::ProfileStore;

/// Blocking access to a local profile database, for tools that do not run
/// their own async runtime.
pub struct Client {
    store: ProfileStore<ProfileDb>,
    runtime: Runtime,
}

impl Client {
    pub fn new<P: AsRef<Path>>(p: P) -> anyhow::Result<Self> {
        let db = ProfileDb::open(p)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let client = Self {
            store: ProfileStore::new(db),
            runtime,
        };

        Ok(client)
    }

    pub fn create(&self, fields: ProfileFields) -> Result<Profile> {
        self.runtime.block_on(self.store.create(fields))
    }

    pub fn read(&self) -> Result<Profile> {
        self.runtime.block_on(self.store.read())
    }

    pub fn update(&self, fields: ProfileFields) -> Result<Profile> {
        self.runtime.block_on(self.store.update(fields))
    }

    pub fn delete(&self) -> Result<Profile> {
        self.runtime.block_on(self.store.delete())
    }

    pub fn projects_by_skill(&self, skill: &str) -> Result<query::SkillProjects> {
        query::projects_by_skill(&self.read()?, skill)
    }

    pub fn top_skills(&self) -> Result<Vec<query::SkillCount>> {
        Ok(query::top_skills(&self.read()?))
    }

    pub fn search(&self, q: &str) -> Result<query::SearchResults> {
        query::search(&self.read()?, q)
    }
}
