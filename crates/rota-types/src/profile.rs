use serde::{Deserialize, Serialize};

/// Personal data shared by customers and administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        national_id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login input. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    // Plain equality on both fields, case included.
    pub fn matches(&self, profile: &Profile) -> bool {
        self.email == profile.email && self.password == profile.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_match_exactly() {
        let profile = Profile::new("Ana", "123", "ana@mail.com", "secret");
        assert!(Credentials::new("ana@mail.com", "secret").matches(&profile));
        assert!(!Credentials::new("ana@mail.com", "Secret").matches(&profile));
        assert!(!Credentials::new("ANA@mail.com", "secret").matches(&profile));
        assert!(!Credentials::new("ana@mail.com ", "secret").matches(&profile));
    }
}
