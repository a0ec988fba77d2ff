//! Tests for the auth module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use test_case::test_case;

fn file_values(token: Option<&str>, organization: Option<&str>, instance: Option<&str>) -> StaticConfig {
    StaticConfig::new(ConfigValues {
        token: token.map(String::from),
        organization: organization.map(String::from),
        instance: instance.map(String::from),
    })
}

fn env_with(pairs: &[(&str, &str)]) -> MapEnv {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

// ============================================================================
// Precedence
// ============================================================================

#[test_case(Some("explicit"), Some("env"), Some("file"), Some("explicit") ; "explicit beats env and file")]
#[test_case(Some("explicit"), None, Some("file"), Some("explicit") ; "explicit beats file")]
#[test_case(Some("explicit"), Some("env"), None, Some("explicit") ; "explicit beats env")]
#[test_case(None, Some("env"), Some("file"), Some("env") ; "env beats file")]
#[test_case(None, Some("env"), None, Some("env") ; "env alone")]
#[test_case(None, None, Some("file"), Some("file") ; "file alone")]
#[test_case(None, None, None, None ; "nothing")]
fn test_token_precedence(
    explicit: Option<&str>,
    env: Option<&str>,
    file: Option<&str>,
    expected: Option<&str>,
) {
    let mut builder = Credentials::builder()
        .env(env.map_or_else(MapEnv::new, |v| env_with(&[(TOKEN_ENV, v)])))
        .config(file_values(file, None, None));
    if let Some(token) = explicit {
        builder = builder.token(token);
    }

    let creds = builder.resolve().unwrap();
    assert_eq!(creds.token().ok(), expected);
}

#[test_case(Some("explicit-org"), Some("env-org"), Some("file-org"), Some("explicit-org") ; "explicit beats env and file")]
#[test_case(None, Some("env-org"), Some("file-org"), Some("env-org") ; "env beats file")]
#[test_case(None, None, Some("file-org"), Some("file-org") ; "file alone")]
#[test_case(None, None, None, None ; "nothing")]
fn test_organization_precedence(
    explicit: Option<&str>,
    env: Option<&str>,
    file: Option<&str>,
    expected: Option<&str>,
) {
    let mut builder = Credentials::builder()
        .env(env.map_or_else(MapEnv::new, |v| env_with(&[(ORGANIZATION_ENV, v)])))
        .config(file_values(None, file, None));
    if let Some(org) = explicit {
        builder = builder.organization(org);
    }

    let creds = builder.resolve().unwrap();
    assert_eq!(creds.organization_opt(), expected);
}

#[test_case(Some("explicit.host"), Some("env.host"), Some("file.host"), "explicit.host" ; "explicit beats env and file")]
#[test_case(None, Some("env.host"), Some("file.host"), "env.host" ; "env beats file")]
#[test_case(None, None, Some("file.host"), "file.host" ; "file alone")]
#[test_case(None, None, None, DEFAULT_INSTANCE ; "default")]
fn test_instance_precedence(
    explicit: Option<&str>,
    env: Option<&str>,
    file: Option<&str>,
    expected: &str,
) {
    let mut builder = Credentials::builder()
        .env(env.map_or_else(MapEnv::new, |v| env_with(&[(INSTANCE_ENV, v)])))
        .config(file_values(None, None, file));
    if let Some(instance) = explicit {
        builder = builder.instance(instance);
    }

    let creds = builder.resolve().unwrap();
    assert_eq!(creds.instance(), expected);
}

#[test]
fn test_fields_resolve_independently() {
    let creds = Credentials::builder()
        .instance("onprem.example.com")
        .env(env_with(&[(TOKEN_ENV, "env-token")]))
        .config(file_values(Some("file-token"), Some("file-org"), Some("file.host")))
        .resolve()
        .unwrap();

    assert_eq!(creds.token().unwrap(), "env-token");
    assert_eq!(creds.organization().unwrap(), "file-org");
    assert_eq!(creds.instance(), "onprem.example.com");

    let origins = creds.origins();
    assert_eq!(origins.token, FieldOrigin::env(TOKEN_ENV));
    assert_eq!(origins.organization, FieldOrigin::config_file("static config"));
    assert_eq!(origins.instance, FieldOrigin::Explicit);
}

#[test]
fn test_blank_values_fall_through() {
    let creds = Credentials::builder()
        .token("   ")
        .env(env_with(&[(TOKEN_ENV, ""), (ORGANIZATION_ENV, " org-1 ")]))
        .config(file_values(Some("file-token"), None, Some("")))
        .resolve()
        .unwrap();

    assert_eq!(creds.token().unwrap(), "file-token");
    assert_eq!(creds.organization().unwrap(), "org-1");
    assert_eq!(creds.instance(), DEFAULT_INSTANCE);
    assert_eq!(creds.origins().instance, FieldOrigin::Default);
}

#[test]
fn test_missing_token_is_deferred() {
    let creds = Credentials::builder()
        .env(MapEnv::new())
        .config(StaticConfig::empty())
        .resolve()
        .unwrap();

    assert!(!creds.has_token());
    assert_eq!(creds.origins().token, FieldOrigin::Unset);
    match creds.token() {
        Err(Error::MissingCredentials { field }) => assert_eq!(field, "token"),
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
    assert!(matches!(
        creds.organization(),
        Err(Error::MissingCredentials { ref field }) if field == "organization"
    ));
}

#[test]
fn test_config_not_loaded_when_everything_explicit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(&path, "this is not ini [[[").unwrap();

    // An invalid file is never read if nothing falls through to it
    let creds = Credentials::builder()
        .token("t")
        .organization("o")
        .instance("i")
        .env(MapEnv::new())
        .config_file(&path)
        .resolve()
        .unwrap();
    assert_eq!(creds.token().unwrap(), "t");
}

// ============================================================================
// INI config file
// ============================================================================

#[test]
fn test_config_file_token_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(&path, "[DEFAULT]\ntoken=abc123\n").unwrap();

    let creds = Credentials::builder()
        .env(MapEnv::new())
        .config_file(&path)
        .resolve()
        .unwrap();

    assert_eq!(creds.token().unwrap(), "abc123");
    assert_eq!(
        creds.origins().token,
        FieldOrigin::config_file(path.display().to_string())
    );
    assert_eq!(creds.instance(), DEFAULT_INSTANCE);
}

#[test]
fn test_config_file_all_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(
        &path,
        "; deepint credentials\n[DEFAULT]\ntoken = file\norganization = 3a874c05\nInstance = deepint.example.org\n",
    )
    .unwrap();

    let values = IniConfigFile::at(&path).load().unwrap().unwrap();
    assert_eq!(
        values,
        ConfigValues {
            token: Some("file".to_string()),
            organization: Some("3a874c05".to_string()),
            instance: Some("deepint.example.org".to_string()),
        }
    );
}

#[test]
fn test_config_file_values_are_kept_raw() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(
        &path,
        "[DEFAULT]\ntoken = ab#cd;ef\\gh\"x\norganization = \"org\"\n",
    )
    .unwrap();

    let values = IniConfigFile::at(&path).load().unwrap().unwrap();
    assert_eq!(values.token.as_deref(), Some(r#"ab#cd;ef\gh"x"#));
    assert_eq!(values.organization.as_deref(), Some(r#""org""#));

    let creds = Credentials::builder()
        .env(MapEnv::new())
        .config_file(&path)
        .resolve()
        .unwrap();
    assert_eq!(creds.token().unwrap(), r#"ab#cd;ef\gh"x"#);
}

#[test]
fn test_env_beats_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(&path, "[DEFAULT]\ntoken = file\n").unwrap();

    let creds = Credentials::builder()
        .env(env_with(&[(TOKEN_ENV, "token")]))
        .config_file(&path)
        .resolve()
        .unwrap();

    assert_eq!(creds.token().unwrap(), "token");
}

#[test]
fn test_absent_config_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let source = IniConfigFile::at(dir.path().join("missing.ini"));
    assert!(source.load().unwrap().is_none());
}

#[test]
fn test_config_file_without_default_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(&path, "[profile]\ntoken = abc\n").unwrap();

    let err = Credentials::builder()
        .env(MapEnv::new())
        .config_file(&path)
        .resolve()
        .unwrap_err();

    match err {
        Error::InvalidConfigFile { path: p, message } => {
            assert_eq!(p, path);
            assert!(message.contains("DEFAULT"));
        }
        other => panic!("expected InvalidConfigFile, got {other:?}"),
    }
}

#[test]
fn test_unparsable_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".deepint.ini");
    fs::write(&path, "[DEFAULT\ntoken = abc\n").unwrap();

    let err = IniConfigFile::at(&path).load().unwrap_err();
    assert!(matches!(err, Error::InvalidConfigFile { .. }));
}

#[test]
fn test_unreadable_config_path() {
    // A directory where the file should be
    let dir = tempdir().unwrap();
    let err = IniConfigFile::at(dir.path()).load().unwrap_err();
    assert!(matches!(err, Error::InvalidConfigFile { .. }));
}

// ============================================================================
// Credentials helpers
// ============================================================================

#[test]
fn test_fixed_credentials() {
    let creds = Credentials::fixed("tok", Some("org".to_string()), None);
    assert_eq!(creds.token().unwrap(), "tok");
    assert_eq!(creds.organization().unwrap(), "org");
    assert_eq!(creds.instance(), DEFAULT_INSTANCE);
    assert_eq!(creds.origins().instance, FieldOrigin::Default);
}

#[test]
fn test_with_organization() {
    let creds = Credentials::fixed("tok", None, None).with_organization("other");
    assert_eq!(creds.organization().unwrap(), "other");
    assert_eq!(creds.origins().organization, FieldOrigin::Explicit);
}

#[test]
fn test_api_base() {
    let creds = Credentials::fixed("tok", None, None);
    assert_eq!(
        creds.api_base().unwrap().as_str(),
        "https://app.deepint.net/api/v1/"
    );

    let creds = Credentials::fixed("tok", None, Some("http://127.0.0.1:8080/".to_string()));
    assert_eq!(
        creds.api_base().unwrap().as_str(),
        "http://127.0.0.1:8080/api/v1/"
    );
}

#[test]
fn test_api_base_invalid_instance() {
    let creds = Credentials::fixed("tok", None, Some("bad host name".to_string()));
    assert!(matches!(creds.api_base(), Err(Error::InvalidUrl(_))));
}

#[test]
fn test_debug_redacts_token() {
    let creds = Credentials::fixed("secret-token-1234", None, None);
    let debug = format!("{creds:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("1234"));
    assert_eq!(creds.redacted_token().unwrap(), "*************1234");
}
