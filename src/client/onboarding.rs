//! First-run wizard that collects the user's profile.

use super::user::UserStore;
use crate::models::UserProfile;

/// Index of the confirmation step; `complete` is only valid here.
pub const LAST_STEP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    Photo,
    Identity,
    Email,
    Confirm,
}

impl OnboardingStep {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Welcome,
            1 => Self::Photo,
            2 => Self::Identity,
            3 => Self::Email,
            _ => Self::Confirm,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub name: String,
    pub username: String,
    pub email: String,
    /// Reference to the chosen photo (path or URL).
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OnboardingWizard {
    pub step: usize,
    pub form: OnboardingForm,
}

impl OnboardingWizard {
    pub fn current_step(&self) -> OnboardingStep {
        OnboardingStep::from_index(self.step)
    }

    /// Whether the current step's inputs allow moving on.
    pub fn is_step_valid(&self) -> bool {
        let form = &self.form;
        match self.current_step() {
            OnboardingStep::Photo => form.photo.is_some(),
            OnboardingStep::Identity => {
                !form.name.trim().is_empty() && !form.username.trim().is_empty()
            }
            OnboardingStep::Email => !form.email.trim().is_empty() && form.email.contains('@'),
            OnboardingStep::Welcome | OnboardingStep::Confirm => true,
        }
    }

    /// Advance when the current step is valid. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.is_step_valid() && self.step < LAST_STEP {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1);
    }

    /// Build the profile on the confirm step and hand it to the user store.
    /// Returns `None` (and changes nothing) on any earlier step.
    pub fn complete(&self, user: &mut UserStore) -> Option<UserProfile> {
        if self.current_step() != OnboardingStep::Confirm {
            return None;
        }
        let profile = UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.form.name.clone(),
            username: self.form.username.clone(),
            email: self.form.email.clone(),
            photo: self.form.photo.clone(),
        };
        user.set_user(profile.clone());
        Some(profile)
    }
}
