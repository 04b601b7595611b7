use super::*;
use serial_test::serial;

/// Runs `f` with the given environment variables set, restoring the prior
/// state afterwards. Tests touching the environment are serialized.
fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        unsafe { std::env::set_var(key, value) };
    }

    f();

    for (key, value) in saved {
        match value {
            Some(value) => unsafe { std::env::set_var(&key, value) },
            None => unsafe { std::env::remove_var(&key) },
        }
    }
}

#[test]
#[serial]
fn test_defaults_when_env_unset() {
    with_env_vars(&[], || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.cache_retention_days, DEFAULT_CACHE_RETENTION_DAYS);
        assert!(config.index_path.is_none());
        assert!(!config.encoder_stub);
        assert_eq!(config.thresholds, Thresholds::default());
    });
}

#[test]
#[serial]
fn test_env_overrides() {
    with_env_vars(
        &[
            ("VERITEXT_PORT", "9191"),
            ("VERITEXT_BIND_ADDR", "0.0.0.0"),
            ("VERITEXT_CACHE_DIR", "/tmp/veritext-cache"),
            ("VERITEXT_INDEX_PATH", "/data/corpus.vtix"),
            ("VERITEXT_CORPUS_PATH", "/data/corpus.json"),
            ("VERITEXT_ENCODER_STUB", "1"),
            ("VERITEXT_THRESHOLD_DIRECT", "0.97"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.port, 9191);
            assert_eq!(config.bind_addr, "0.0.0.0");
            assert_eq!(config.cache_dir, std::path::Path::new("/tmp/veritext-cache"));
            assert_eq!(
                config.index_path.as_deref(),
                Some(std::path::Path::new("/data/corpus.vtix"))
            );
            assert!(config.encoder_stub);
            assert_eq!(config.thresholds.direct, 0.97);
            // Untouched thresholds keep their defaults.
            assert_eq!(config.thresholds.paraphrase, Thresholds::default().paraphrase);
        },
    );
}

#[test]
#[serial]
fn test_unparseable_value_is_an_error() {
    with_env_vars(&[("VERITEXT_PORT", "not-a-port")], || {
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { key: "VERITEXT_PORT", .. })
        ));
    });
}

#[test]
#[serial]
fn test_empty_value_falls_back_to_default() {
    with_env_vars(&[("VERITEXT_PORT", ""), ("VERITEXT_INDEX_PATH", "")], || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.index_path.is_none());
    });
}

#[test]
#[serial]
fn test_threshold_out_of_range_is_rejected() {
    with_env_vars(&[("VERITEXT_THRESHOLD_DIRECT", "1.5")], || {
        assert!(matches!(Config::from_env(), Err(ConfigError::Invalid(_))));
    });
}

#[test]
fn test_validate_rejects_inverted_band() {
    let mut config = Config::default();
    config.thresholds.ambiguous_low = 0.9;
    config.thresholds.paraphrase = 0.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_negative_ttl() {
    let config = Config {
        cache_ttl_secs: -5,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}
