use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api::DashboardApi;
use super::optimistic::{SyncOutcome, apply_optimistic};
use super::persist::Persisted;
use crate::errors::ClientError;
use crate::models::UserProfile;
use crate::util::merge_fields_keep_id;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStore {
    pub user: Option<UserProfile>,
    pub is_onboarded: bool,
    #[serde(skip)]
    pub is_loading: bool,
}

impl Persisted for UserStore {
    const STORAGE_KEY: &'static str = "helix-user-storage";
}

impl UserStore {
    /// Install a profile; having one means onboarding is done.
    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
        self.is_onboarded = true;
    }

    pub fn complete_onboarding(&mut self) {
        self.is_onboarded = true;
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.is_onboarded = false;
    }

    /// Merge `updates` into the profile and persist it. A failed write
    /// restores the profile as it was before the call.
    pub async fn update_profile(
        &mut self,
        api: &dyn DashboardApi,
        updates: Value,
    ) -> Result<SyncOutcome, ClientError> {
        let previous = self.user.clone().ok_or(ClientError::NoUser)?;
        let merged =
            merge_fields_keep_id(&previous, &updates, &previous.id).map_err(ClientError::InvalidUpdate)?;
        let id = previous.id.clone();

        apply_optimistic(
            "update profile",
            &mut self.user,
            |user| *user = Some(merged),
            api.update_user(&id, &updates),
            || async move { Ok(Some(previous)) },
        )
        .await
    }

    /// Upload a profile photo and point the profile at the stored copy.
    ///
    /// Not optimistic: the profile only changes once the server has the
    /// file. On failure the profile is untouched and the error returned.
    pub async fn upload_photo(
        &mut self,
        api: &dyn DashboardApi,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let id = self.user.as_ref().map(|u| u.id.clone()).ok_or(ClientError::NoUser)?;

        self.is_loading = true;
        let result = api.upload_photo(&id, file_name, bytes).await;
        self.is_loading = false;

        let photo_url = result?;
        if let Some(user) = self.user.as_mut() {
            user.photo = Some(photo_url.clone());
        }
        Ok(photo_url)
    }
}
