use std::fmt;

/// Taxpayer credentials used to obtain an access token.
///
/// Only constructible when both the taxpayer id (INN) and the secret are present
/// and non-empty; the id is stored trimmed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    inn: String,
    password: String,
}

impl Credentials {
    /// Returns `None` if either field is missing or empty after trimming the id.
    pub fn new(inn: Option<&str>, password: Option<&str>) -> Option<Self> {
        let inn = inn.map(str::trim).filter(|inn| !inn.is_empty())?;
        let password = password.filter(|password| !password.is_empty())?;
        Some(Self {
            inn: inn.to_string(),
            password: password.to_string(),
        })
    }

    pub fn inn(&self) -> &str {
        &self.inn
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("inn", &self.inn)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque access token handed out by the API client.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_trim_inn() {
        let credentials = Credentials::new(Some("  500100732259 \n"), Some("secret")).unwrap();
        assert_eq!(credentials.inn(), "500100732259");
        assert_eq!(credentials.password(), "secret");
    }

    #[test]
    fn test_credentials_missing_fields() {
        assert!(Credentials::new(None, Some("secret")).is_none());
        assert!(Credentials::new(Some("500100732259"), None).is_none());
        assert!(Credentials::new(None, None).is_none());
    }

    #[test]
    fn test_credentials_empty_fields() {
        assert!(Credentials::new(Some(""), Some("secret")).is_none());
        assert!(Credentials::new(Some("   "), Some("secret")).is_none());
        assert!(Credentials::new(Some("500100732259"), Some("")).is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new(Some("500100732259"), Some("hunter2")).unwrap();
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("500100732259"));
        assert!(!rendered.contains("hunter2"));

        let token = AuthToken::new("eyJhbGciOi");
        assert!(!format!("{token:?}").contains("eyJhbGciOi"));
    }
}
