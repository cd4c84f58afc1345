use border_agent::AgentConfig;
use figment::Jail;
use std::time::Duration;

#[test]
fn test_default_config() {
    Jail::expect_with(|_jail| {
        let config = AgentConfig::load().expect("defaults should load");

        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.poll_timeout(), Duration::from_secs(10));
        assert_eq!(config.update_timeout(), Some(Duration::from_secs(10)));
        assert!(config.start_proxy);
        Ok(())
    });
}

#[test]
fn test_toml_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "border-agent.toml",
            r#"
                poll_timeout_ms = 250
                start_proxy = false
            "#,
        )?;

        let config = AgentConfig::load().expect("toml config should load");

        assert_eq!(config.poll_timeout(), Duration::from_millis(250));
        assert!(!config.start_proxy);
        assert_eq!(
            config.update_timeout_ms,
            Some(10_000),
            "Unset keys keep their defaults"
        );
        Ok(())
    });
}

#[test]
fn test_env_overrides_files() {
    Jail::expect_with(|jail| {
        jail.create_file("border-agent.toml", "poll_timeout_ms = 250")?;
        jail.create_file("border-agent.json", r#"{ "update_timeout_ms": 500 }"#)?;
        jail.set_env("BORDER_AGENT_POLL_TIMEOUT_MS", "42");

        let config = AgentConfig::load().expect("layered config should load");

        assert_eq!(config.poll_timeout_ms, 42);
        assert_eq!(config.update_timeout(), Some(Duration::from_millis(500)));
        Ok(())
    });
}

#[test]
fn test_invalid_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("border-agent.toml", "poll_timeout_ms = \"soon\"")?;

        assert!(AgentConfig::load().is_err());
        Ok(())
    });
}
