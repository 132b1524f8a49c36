use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_BIO_LEN: usize = 200;

/// Public profile attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub is_private: bool,
    pub allow_friend_requests: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            is_private: false,
            allow_friend_requests: true,
        }
    }
}

/// User entity - a member of the network.
///
/// `friends` is one half of a symmetric relation: every id in it must list
/// this user back. Only the friendship service and the repositories'
/// transactional operations touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: Profile,
    pub friends: Vec<Uuid>,
    pub privacy: PrivacySettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a user embedded in feeds, comments and notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

/// Partial profile edit. `None` and blank strings leave a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub website: Option<String>,
    pub is_private: Option<bool>,
    pub allow_friend_requests: Option<bool>,
}

/// Generated avatar used when a user registers without one.
pub fn default_avatar(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}")
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(
        username: &str,
        email: &str,
        password_hash: String,
        avatar: Option<String>,
    ) -> Result<Self, DomainError> {
        let username = username.trim().to_string();
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(DomainError::validation(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }

        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("Invalid email address"));
        }

        let avatar = avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_avatar(&username));

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            profile: Profile {
                avatar,
                ..Profile::default()
            },
            friends: Vec::new(),
            privacy: PrivacySettings::default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_friend_of(&self, other: Uuid) -> bool {
        self.friends.contains(&other)
    }

    /// Idempotent add. Returns `true` if the set changed.
    pub fn add_friend(&mut self, other: Uuid) -> bool {
        if self.is_friend_of(other) {
            return false;
        }
        self.friends.push(other);
        self.updated_at = Utc::now();
        true
    }

    /// Returns `true` if `other` was in the set.
    pub fn remove_friend(&mut self, other: Uuid) -> bool {
        let before = self.friends.len();
        self.friends.retain(|f| *f != other);
        let changed = self.friends.len() != before;
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn apply_profile_update(&mut self, update: ProfileUpdate) -> Result<(), DomainError> {
        if let Some(bio) = non_blank(update.bio) {
            if bio.chars().count() > MAX_BIO_LEN {
                return Err(DomainError::validation(format!(
                    "Bio cannot exceed {MAX_BIO_LEN} characters"
                )));
            }
            self.profile.bio = Some(bio);
        }
        if let Some(first_name) = non_blank(update.first_name) {
            self.profile.first_name = Some(first_name);
        }
        if let Some(last_name) = non_blank(update.last_name) {
            self.profile.last_name = Some(last_name);
        }
        if let Some(website) = non_blank(update.website) {
            self.profile.website = Some(website);
        }
        if let Some(avatar) = non_blank(update.avatar) {
            self.profile.avatar = avatar;
        }
        if let Some(is_private) = update.is_private {
            self.privacy.is_private = is_private;
        }
        if let Some(allow) = update.allow_friend_requests {
            self.privacy.allow_friend_requests = allow;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            avatar: self.profile.avatar.clone(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name, &format!("{name}@example.com"), "hash".into(), None).unwrap()
    }

    #[test]
    fn test_new_user_normalizes_and_defaults_avatar() {
        let user = User::new("  alice ", " Alice@Example.COM ", "hash".into(), None).unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.profile.avatar, default_avatar("alice"));
        assert!(user.friends.is_empty());
        assert!(user.privacy.allow_friend_requests);
    }

    #[test]
    fn test_new_user_rejects_short_username_and_bad_email() {
        assert!(matches!(
            User::new("al", "al@example.com", "hash".into(), None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            User::new("alice", "not-an-email", "hash".into(), None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_add_friend_is_idempotent() {
        let mut alice = user("alice");
        let bob = Uuid::new_v4();

        assert!(alice.add_friend(bob));
        assert!(!alice.add_friend(bob));
        assert_eq!(alice.friends, vec![bob]);

        assert!(alice.remove_friend(bob));
        assert!(!alice.remove_friend(bob));
        assert!(alice.friends.is_empty());
    }

    #[test]
    fn test_profile_update_keeps_blank_fields() {
        let mut alice = user("alice");
        alice.profile.first_name = Some("Alice".into());

        alice
            .apply_profile_update(ProfileUpdate {
                first_name: Some("   ".into()),
                bio: Some("hello".into()),
                allow_friend_requests: Some(false),
                ..ProfileUpdate::default()
            })
            .unwrap();

        assert_eq!(alice.profile.first_name.as_deref(), Some("Alice"));
        assert_eq!(alice.profile.bio.as_deref(), Some("hello"));
        assert!(!alice.privacy.allow_friend_requests);
    }

    #[test]
    fn test_profile_update_rejects_long_bio() {
        let mut alice = user("alice");
        let result = alice.apply_profile_update(ProfileUpdate {
            bio: Some("x".repeat(201)),
            ..ProfileUpdate::default()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
