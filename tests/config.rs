// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, credential env vars and environment lookup.

use greenfleet::config::*;
use greenfleet::error::Error;
use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

fn credentials(key: &str) -> Option<String> {
    let vars: HashMap<&str, &str> = [("CF_USERNAME", "deployer"), ("CF_PASSWORD", "s3cret")]
        .into_iter()
        .collect();
    vars.get(key).map(|v| v.to_string())
}

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
environments:
  - name: prod
    foundations:
      - https://api.cf1.example.com
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        let prod = config.environment("prod").unwrap();
        assert_eq!(prod.foundations, vec!["https://api.cf1.example.com"]);
        assert_eq!(prod.instances, 1);
        assert!(!prod.skip_ssl);
        assert_eq!(config.precheck_timeout, Duration::from_secs(15));
        assert_eq!(config.max_concurrency, None);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
precheck_timeout: 5s
max_concurrency: 3

environments:
  - name: Production
    domain: apps.example.com
    skip_ssl: true
    instances: 4
    foundations:
      - https://api.cf1.example.com
      - https://api.cf2.example.com
  - name: staging
    domain: staging.example.com
    foundations:
      - https://api.cf3.example.com
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        assert_eq!(config.environments.len(), 2);
        assert_eq!(config.username, "deployer");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.precheck_timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrency, Some(3));

        let prod = config.environment("production").unwrap();
        assert_eq!(prod.name, "Production");
        assert_eq!(prod.domain, "apps.example.com");
        assert_eq!(prod.instances, 4);
        assert!(prod.skip_ssl);
        assert_eq!(prod.foundations.len(), 2);
    }

    #[test]
    fn environment_lookup_ignores_case() {
        let yaml = r#"
environments:
  - name: Staging
    foundations: [https://api.cf1.example.com]
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        assert!(config.environment("STAGING").is_ok());
        assert!(config.environment("staging").is_ok());
        assert!(matches!(
            config.environment("prod"),
            Err(Error::UnknownEnvironment(name)) if name == "prod"
        ));
    }

    #[test]
    fn zero_instances_defaults_to_one() {
        let yaml = r#"
environments:
  - name: prod
    instances: 0
    foundations: [https://api.cf1.example.com]
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        assert_eq!(config.environment("prod").unwrap().instances, 1);
    }

    #[test]
    fn zero_max_concurrency_means_unlimited() {
        let yaml = r#"
max_concurrency: 0
environments:
  - name: prod
    foundations: [https://api.cf1.example.com]
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        assert_eq!(config.max_concurrency, None);
    }

    #[test]
    fn empty_foundation_list_is_accepted() {
        let yaml = r#"
environments:
  - name: prod
    foundations: []
"#;
        let config = Config::from_yaml_with_env(yaml, credentials).unwrap();

        assert!(config.environment("prod").unwrap().foundations.is_empty());
    }
}

mod validation {
    use super::*;

    #[test]
    fn empty_document_has_no_environments() {
        let err = Config::from_yaml_with_env("--- ~\n", credentials).unwrap_err();
        assert!(matches!(err, Error::EnvironmentsNotSpecified));
    }

    #[test]
    fn missing_environments_key() {
        let err = Config::from_yaml_with_env("precheck_timeout: 5s\n", credentials).unwrap_err();
        assert!(matches!(err, Error::EnvironmentsNotSpecified));
    }

    #[test]
    fn empty_environments_list() {
        let err = Config::from_yaml_with_env("environments: []\n", credentials).unwrap_err();
        assert!(matches!(err, Error::EnvironmentsNotSpecified));
    }

    #[test]
    fn environment_without_name() {
        let yaml = r#"
environments:
  - foundations: [https://api.cf1.example.com]
"#;
        let err = Config::from_yaml_with_env(yaml, credentials).unwrap_err();
        assert!(matches!(err, Error::MissingParameter("name")));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn environment_with_blank_name() {
        let yaml = r#"
environments:
  - name: "  "
    foundations: [https://api.cf1.example.com]
"#;
        let err = Config::from_yaml_with_env(yaml, credentials).unwrap_err();
        assert!(matches!(err, Error::MissingParameter("name")));
    }

    #[test]
    fn environment_without_foundations() {
        let yaml = r#"
environments:
  - name: prod
    domain: apps.example.com
"#;
        let err = Config::from_yaml_with_env(yaml, credentials).unwrap_err();
        assert!(matches!(err, Error::MissingParameter("foundations")));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = Config::from_yaml_with_env("environments: [", credentials).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn invalid_precheck_timeout() {
        let yaml = r#"
precheck_timeout: soon
environments:
  - name: prod
    foundations: [https://api.cf1.example.com]
"#;
        let err = Config::from_yaml_with_env(yaml, credentials).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}

mod env_vars {
    use super::*;

    const YAML: &str = r#"
environments:
  - name: prod
    foundations: [https://api.cf1.example.com]
"#;

    #[test]
    fn all_missing_variables_are_listed() {
        let err = Config::from_yaml_with_env(YAML, |_| None).unwrap_err();

        match &err {
            Error::MissingEnvVars(vars) => {
                assert_eq!(vars, &vec!["CF_USERNAME".to_string(), "CF_PASSWORD".to_string()]);
            }
            other => panic!("expected missing env vars, got {other:?}"),
        }
        assert!(err.to_string().contains("CF_USERNAME, CF_PASSWORD"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = Config::from_yaml_with_env(YAML, |key| match key {
            USERNAME_ENV => Some("deployer".to_string()),
            PASSWORD_ENV => Some(String::new()),
            _ => None,
        })
        .unwrap_err();

        assert!(matches!(err, Error::MissingEnvVars(vars) if vars == vec!["CF_PASSWORD"]));
    }

    #[test]
    fn load_reads_process_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greenfleet.yml");
        std::fs::write(&path, YAML).unwrap();

        temp_env::with_vars(
            [
                ("CF_USERNAME", Some("env-user")),
                ("CF_PASSWORD", Some("env-pass")),
            ],
            || {
                let config = Config::load(&path).unwrap();
                assert_eq!(config.username, "env-user");
                assert_eq!(config.password, "env-pass");
            },
        );
    }

    #[test]
    fn unrelated_variables_do_not_affect_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greenfleet.yml");
        std::fs::write(&path, YAML).unwrap();

        temp_env::with_vars(
            [
                ("CF_USERNAME", Some("env-user")),
                ("CF_PASSWORD", Some("env-pass")),
                ("PORT", Some("eighty")),
            ],
            || {
                let config = Config::load(&path).unwrap();
                assert!(config.environment("prod").is_ok());
            },
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load(std::path::Path::new("/nonexistent/greenfleet.yml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

proptest! {
    #[test]
    fn configured_instances_are_never_zero(instances in any::<u16>()) {
        let yaml = format!(
            "environments:\n  - name: prod\n    instances: {instances}\n    foundations: [https://api.cf1.example.com]\n"
        );
        let config = Config::from_yaml_with_env(&yaml, credentials).unwrap();
        let resolved = config.environment("prod").unwrap().instances;

        prop_assert!(resolved >= 1);
        prop_assert_eq!(resolved, normalize_instances(instances));
        if instances > 0 {
            prop_assert_eq!(resolved, instances);
        }
    }
}
