use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DeviceError, DeviceResult};
use crate::model::DeviceProfile;
use crate::traits::DeviceProfileProvider;

/// Printer profiles backed by a JSON file holding an array of profiles
#[derive(Debug, Clone)]
pub struct DeviceManager {
    store: PathBuf,
    profiles: Vec<DeviceProfile>,
}

impl DeviceManager {
    /// Empty store that will be written to `store`
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            profiles: Vec::new(),
        }
    }

    /// Load every profile from `store`
    ///
    /// # Errors
    /// Fails if the file is missing or unreadable, is not a JSON array of
    /// profiles, or holds an invalid profile or a duplicate id.
    pub fn load(store: impl Into<PathBuf>) -> DeviceResult<Self> {
        let store = store.into();
        let content = std::fs::read_to_string(&store)
            .map_err(|e| DeviceError::LoadError(format!("{}: {}", store.display(), e)))?;
        let loaded: Vec<DeviceProfile> = serde_json::from_str(&content)?;

        let mut manager = Self::new(store);
        for profile in loaded {
            manager.add_profile(profile)?;
        }

        info!(
            store = %manager.store.display(),
            profiles = manager.profiles.len(),
            "loaded printer profiles"
        );
        Ok(manager)
    }

    /// Write every profile back to the store
    pub fn save(&self) -> DeviceResult<()> {
        let content = serde_json::to_string_pretty(&self.profiles)?;
        if let Some(parent) = self.store.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.store, content)
            .map_err(|e| DeviceError::SaveError(format!("{}: {}", self.store.display(), e)))?;

        debug!(store = %self.store.display(), "saved printer profiles");
        Ok(())
    }

    /// File the profiles are loaded from and saved to
    pub fn store_path(&self) -> &Path {
        &self.store
    }

    /// Profiles sorted by name
    pub fn get_all_profiles(&self) -> Vec<DeviceProfile> {
        let mut profiles = self.profiles.clone();
        profiles.sort_by_key(|p| p.name.to_lowercase());
        profiles
    }

    /// Look a profile up by id, falling back to a case-insensitive name match
    pub fn get_profile(&self, key: &str) -> Option<DeviceProfile> {
        self.profiles
            .iter()
            .find(|p| p.id == key)
            .or_else(|| self.profiles.iter().find(|p| p.matches(key)))
            .cloned()
    }

    /// Add a new profile
    ///
    /// # Errors
    /// Fails if the profile is invalid or its id is already taken.
    pub fn add_profile(&mut self, profile: DeviceProfile) -> DeviceResult<()> {
        profile.validate()?;
        if self.profiles.iter().any(|p| p.id == profile.id) {
            return Err(DeviceError::ProfileAlreadyExists(profile.id));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Insert or replace a profile by id
    pub fn save_profile(&mut self, profile: DeviceProfile) -> DeviceResult<()> {
        profile.validate()?;
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        Ok(())
    }

    /// Remove the profile with this id
    ///
    /// # Errors
    /// Fails with `ProfileNotFound` if no profile has the id.
    pub fn delete_profile(&mut self, id: &str) -> DeviceResult<()> {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            return Err(DeviceError::ProfileNotFound(id.to_string()));
        }
        Ok(())
    }
}

impl DeviceProfileProvider for DeviceManager {
    fn get_profile(&self, id: &str) -> Option<DeviceProfile> {
        DeviceManager::get_profile(self, id)
    }

    fn list_profiles(&self) -> Vec<DeviceProfile> {
        self.get_all_profiles()
    }
}
