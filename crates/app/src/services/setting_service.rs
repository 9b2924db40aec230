//! Setting service — admin-editable site configuration.

use std::collections::BTreeMap;

use community_domain::error::{CommunityError, ConflictError};
use community_domain::id::SettingId;
use community_domain::setting::{NewSetting, Setting, SettingValue};
use community_domain::time::now;

use crate::ports::SettingRepository;

pub struct SettingService<R> {
    repo: R,
}

impl<R: SettingRepository> SettingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All settings keyed by group.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_grouped(
        &self,
        group: Option<String>,
    ) -> Result<BTreeMap<String, Vec<Setting>>, CommunityError> {
        let mut grouped: BTreeMap<String, Vec<Setting>> = BTreeMap::new();
        for setting in self.repo.list_settings(group).await? {
            grouped.entry(setting.group.clone()).or_default().push(setting);
        }
        Ok(grouped)
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when no setting has that name.
    pub async fn get(&self, name: &str) -> Result<Setting, CommunityError> {
        self.repo
            .find_setting(name)
            .await?
            .ok_or_else(|| CommunityError::not_found("config", name))
    }

    /// Write several values at once; entries without a name are skipped.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn update(&self, values: Vec<SettingValue>) -> Result<u64, CommunityError> {
        let values: Vec<SettingValue> = values
            .into_iter()
            .filter(|v| !v.name.trim().is_empty())
            .collect();
        if values.is_empty() {
            return Ok(0);
        }
        let changed = self.repo.update_setting_values(values, now()).await?;
        tracing::info!(changed, "settings updated");
        Ok(changed)
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] on a missing field and
    /// [`CommunityError::Conflict`] when the name is taken.
    pub async fn create(&self, setting: NewSetting) -> Result<SettingId, CommunityError> {
        setting.validate()?;
        if self.repo.find_setting(&setting.name).await?.is_some() {
            return Err(ConflictError::Duplicate {
                entity: "config",
                key: setting.name,
            }
            .into());
        }
        self.repo.create_setting(setting, now()).await
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::NotFound`] when no setting has that name.
    pub async fn delete(&self, name: &str) -> Result<(), CommunityError> {
        if !self.repo.delete_setting(name).await? {
            return Err(CommunityError::not_found("config", name));
        }
        Ok(())
    }

    /// Value of a visible setting; hidden and missing settings read as `None`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn public_value(&self, name: &str) -> Result<Option<String>, CommunityError> {
        Ok(self
            .repo
            .find_setting(name)
            .await?
            .filter(|s| s.status.is_visible())
            .and_then(|s| s.value))
    }

    /// Every visible setting as a `name -> value` map.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn public_values(&self) -> Result<BTreeMap<String, Option<String>>, CommunityError> {
        Ok(self
            .repo
            .list_settings(None)
            .await?
            .into_iter()
            .filter(|s| s.status.is_visible())
            .map(|s| (s.name, s.value))
            .collect())
    }
}
