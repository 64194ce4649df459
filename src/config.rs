use crate::domain::credentials::Credentials;
use clap::Args;

/// Taxpayer credentials, taken from flags or the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialsArgs {
    /// Taxpayer identification number (INN)
    #[arg(long, env = "NALOGO_INN")]
    pub inn: Option<String>,

    /// Password for the taxpayer account
    #[arg(long, env = "NALOGO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl CredentialsArgs {
    /// Returns `None` unless both values are present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::new(self.inn.as_deref(), self.password.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        credentials: CredentialsArgs,
    }

    #[test]
    fn test_credentials_from_flags() {
        let cli = TestCli::parse_from(["test", "--inn", " 500100732259 ", "--password", "secret"]);
        let credentials = cli.credentials.credentials().unwrap();
        assert_eq!(credentials.inn(), "500100732259");
    }

    #[test]
    fn test_partial_credentials() {
        let args = CredentialsArgs {
            inn: Some("500100732259".to_string()),
            password: None,
        };
        assert!(args.credentials().is_none());
        assert!(CredentialsArgs::default().credentials().is_none());
    }
}
