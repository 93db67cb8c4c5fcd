use chrono::Utc;
use tracing::{event, instrument, Level};

use crate::db::{Swap, DB};
use crate::error::{ProfileError, Result};
use crate::profile::{Profile, ProfileFields};
use crate::validation::validate;

/// CRUD over the single profile record.
///
/// The store has two states, absent and present. `create` and `delete` are
/// the only transitions between them.
#[derive(Debug, Clone)]
pub struct ProfileStore<T: DB> {
    dbconn: T,
}

impl<T: DB + Send + Sync> ProfileStore<T> {
    pub fn new(dbconn: T) -> Self {
        Self { dbconn }
    }

    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: ProfileFields) -> Result<Profile> {
        if self.dbconn.get_profile().await?.is_some() {
            return Err(ProfileError::already_exists());
        }

        let mut profile = Profile::from_fields(fields, Utc::now());
        profile.normalize();
        validate(&profile)?;

        // a concurrent create may have won since the check above
        if !self.dbconn.insert_profile(&profile).await? {
            return Err(ProfileError::already_exists());
        }

        event!(Level::INFO, id = %profile.id, "Profile created");
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn read(&self) -> Result<Profile> {
        self.dbconn.get_profile().await?.ok_or(ProfileError::NotFound)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(&self, fields: ProfileFields) -> Result<Profile> {
        let current = self.read().await?;

        let mut updated = current.clone();
        updated.apply(fields);
        updated.normalize();
        validate(&updated)?;
        updated.updated_at = Utc::now();

        match self.dbconn.swap_profile(&current, &updated).await? {
            Swap::Replaced => {
                event!(Level::INFO, id = %updated.id, "Profile updated");
                Ok(updated)
            }
            Swap::Missing => Err(ProfileError::NotFound),
            Swap::Changed => Err(ProfileError::Conflict(
                "Profile was modified concurrently".to_string(),
            )),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self) -> Result<Profile> {
        let profile = self
            .dbconn
            .remove_profile()
            .await?
            .ok_or(ProfileError::NotFound)?;
        event!(Level::INFO, id = %profile.id, "Profile deleted");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ProfileDb;
    use crate::profile::{Links, Project};
    use async_trait::async_trait;

    /// Always holds `stored` and answers every swap with `swap`.
    struct RacingDb {
        stored: Profile,
        swap: Swap,
    }

    #[async_trait]
    impl DB for RacingDb {
        async fn get_profile(&self) -> Result<Option<Profile>> {
            Ok(Some(self.stored.clone()))
        }

        async fn insert_profile(&self, _: &Profile) -> Result<bool> {
            Ok(false)
        }

        async fn swap_profile(&self, _: &Profile, _: &Profile) -> Result<Swap> {
            Ok(self.swap)
        }

        async fn remove_profile(&self) -> Result<Option<Profile>> {
            Ok(None)
        }
    }

    fn racing(swap: Swap) -> ProfileStore<RacingDb> {
        ProfileStore::new(RacingDb {
            stored: Profile::from_fields(kapil(), Utc::now()),
            swap,
        })
    }

    fn store() -> ProfileStore<ProfileDb> {
        ProfileStore::new(ProfileDb::temporary().unwrap())
    }

    fn kapil() -> ProfileFields {
        ProfileFields {
            name: Some("Kapil Meena".to_string()),
            email: Some("kapil@example.com".to_string()),
            skills: Some(vec!["Rust".to_string(), "React".to_string()]),
            projects: Some(vec![Project {
                title: Some("Portfolio".to_string()),
                tech_stack: vec!["React".to_string()],
                ..Project::default()
            }]),
            links: Some(Links {
                github: Some("https://github.com/kapil".to_string()),
                ..Links::default()
            }),
            ..ProfileFields::default()
        }
    }

    #[tokio::test]
    async fn create_then_read() {
        let store = store();
        let created = store.create(kapil()).await.unwrap();

        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.read().await.unwrap(), created);
    }

    #[tokio::test]
    async fn second_create_conflicts() {
        let store = store();
        store.create(kapil()).await.unwrap();

        let err = store.create(kapil()).await.unwrap_err();
        assert!(matches!(err, ProfileError::Conflict(_)));
        assert_eq!(err.to_string(), "Profile already exists");
    }

    #[tokio::test]
    async fn create_validates_before_persisting() {
        let store = store();
        let err = store
            .create(ProfileFields {
                email: Some("not-an-email".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap_err();

        match err {
            ProfileError::Validation(details) => assert_eq!(details.len(), 2),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(store.read().await, Err(ProfileError::NotFound)));
    }

    #[tokio::test]
    async fn create_normalizes_name_and_email() {
        let store = store();
        let created = store
            .create(ProfileFields {
                name: Some("  Kapil  ".to_string()),
                email: Some("KAPIL@Example.com".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Kapil");
        assert_eq!(created.email, "kapil@example.com");
    }

    #[tokio::test]
    async fn absent_profile_is_not_found() {
        let store = store();
        assert!(matches!(store.read().await, Err(ProfileError::NotFound)));
        assert!(matches!(
            store.update(kapil()).await,
            Err(ProfileError::NotFound)
        ));
        assert!(matches!(store.delete().await, Err(ProfileError::NotFound)));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let store = store();
        let created = store.create(kapil()).await.unwrap();

        let updated = store
            .update(ProfileFields {
                name: Some("X".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "X");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.skills, created.skills);
        assert_eq!(updated.projects, created.projects);
        assert_eq!(updated.links, created.links);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.read().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_replaces_skills_list() {
        let store = store();
        store.create(kapil()).await.unwrap();

        let updated = store
            .update(ProfileFields {
                skills: Some(vec!["Go".to_string()]),
                ..ProfileFields::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.skills, vec!["Go".to_string()]);
    }

    #[tokio::test]
    async fn update_revalidates() {
        let store = store();
        let created = store.create(kapil()).await.unwrap();

        let err = store
            .update(ProfileFields {
                email: Some("broken".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::Validation(_)));
        assert_eq!(store.read().await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_losing_to_another_writer_conflicts() {
        let err = racing(Swap::Changed)
            .update(ProfileFields {
                name: Some("X".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::Conflict(_)));
        assert_eq!(err.to_string(), "Profile was modified concurrently");
    }

    #[tokio::test]
    async fn update_losing_to_a_delete_is_not_found() {
        let err = racing(Swap::Missing)
            .update(ProfileFields {
                name: Some("X".to_string()),
                ..ProfileFields::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProfileError::NotFound));
    }

    #[tokio::test]
    async fn create_losing_the_insert_race_conflicts() {
        struct EmptyThenTaken;

        #[async_trait]
        impl DB for EmptyThenTaken {
            async fn get_profile(&self) -> Result<Option<Profile>> {
                Ok(None)
            }

            async fn insert_profile(&self, _: &Profile) -> Result<bool> {
                Ok(false)
            }

            async fn swap_profile(&self, _: &Profile, _: &Profile) -> Result<Swap> {
                Ok(Swap::Missing)
            }

            async fn remove_profile(&self) -> Result<Option<Profile>> {
                Ok(None)
            }
        }

        let err = ProfileStore::new(EmptyThenTaken)
            .create(kapil())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Profile already exists");
    }

    #[tokio::test]
    async fn delete_returns_record_and_allows_recreate() {
        let store = store();
        let created = store.create(kapil()).await.unwrap();

        assert_eq!(store.delete().await.unwrap(), created);
        assert!(matches!(store.read().await, Err(ProfileError::NotFound)));
        assert!(store.create(kapil()).await.is_ok());
    }
}
