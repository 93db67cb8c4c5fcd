use std::path::Path;

use async_trait::async_trait;
use sled::CompareAndSwapError;
use tracing::{event, Level};

use crate::error::Result;
use crate::profile::Profile;

const PROFILE_KEY: &[u8] = b"profile";

/// Outcome of a compare-and-swap write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swap {
    Replaced,
    /// Nothing is stored anymore.
    Missing,
    /// Something else was written since the caller read it.
    Changed,
}

/// Single-document persistence. Each method is atomic on its own.
#[async_trait]
pub trait DB {
    async fn get_profile(&self) -> Result<Option<Profile>>;
    /// Stores `profile` only if none exists. Returns false when one already did.
    async fn insert_profile(&self, profile: &Profile) -> Result<bool>;
    /// Replaces `current` with `new`, provided the stored record still equals `current`.
    async fn swap_profile(&self, current: &Profile, new: &Profile) -> Result<Swap>;
    async fn remove_profile(&self) -> Result<Option<Profile>>;
}

#[derive(Clone, Debug)]
pub struct ProfileDb {
    pub db: sled::Db,
}

impl ProfileDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(ProfileDb { db })
    }

    /// A throwaway database that is removed on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(ProfileDb { db })
    }

    async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }
}

#[async_trait]
impl DB for ProfileDb {
    async fn get_profile(&self) -> Result<Option<Profile>> {
        let profile = self.db.get(PROFILE_KEY)?;
        match profile {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<bool> {
        let bytes = bincode::serialize(profile)?;
        match self
            .db
            .compare_and_swap(PROFILE_KEY, None as Option<&[u8]>, Some(bytes))?
        {
            Ok(()) => {
                self.flush().await?;
                Ok(true)
            }
            Err(CompareAndSwapError { .. }) => {
                event!(Level::DEBUG, "Profile already present, insert skipped");
                Ok(false)
            }
        }
    }

    async fn swap_profile(&self, current: &Profile, new: &Profile) -> Result<Swap> {
        // encoding is deterministic, so re-encoding what we read gives the stored bytes
        let old = bincode::serialize(current)?;
        let new = bincode::serialize(new)?;
        match self.db.compare_and_swap(PROFILE_KEY, Some(old), Some(new))? {
            Ok(()) => {
                self.flush().await?;
                Ok(Swap::Replaced)
            }
            Err(CompareAndSwapError { current: None, .. }) => Ok(Swap::Missing),
            Err(CompareAndSwapError { current: Some(_), .. }) => Ok(Swap::Changed),
        }
    }

    async fn remove_profile(&self) -> Result<Option<Profile>> {
        let prev_val = self.db.remove(PROFILE_KEY)?;
        self.flush().await?;
        match prev_val {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }
}
