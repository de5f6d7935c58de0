//! Integration tests for favi

mod http;

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// A favi command isolated from the user's config and cache
    fn favi(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("favi");
        cmd.env("FAVI_CONFIG", temp.path().join("config.toml"))
            .env("FAVI_CACHE_DIR", temp.path().join("icons"))
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("favicon resolver"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("favi"));
    }

    #[test]
    fn config_path_follows_env() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                temp.path().join("config.toml").display().to_string(),
            ));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[resolver]"))
            .stdout(predicate::str::contains("ttl_days = 7"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["config", "set", "cache.ttl_days", "2"])
            .assert()
            .success();

        favi(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ttl_days = 2"));
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["config", "set", "resolver.colour", "blue"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[cache\nttl_days = ").unwrap();

        favi(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn resolve_invalid_url_prints_fallback() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["--no-persist", "resolve", "not a url"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn resolve_json_reports_source() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["--no-persist", "resolve", "--format", "json", "::nope"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"source\": \"fallback (invalid url)\""))
            .stdout(predicate::str::contains("\"domain\": null"));
    }

    #[test]
    fn resolve_reads_stdin() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["--no-persist", "resolve"])
            .write_stdin("# comment\n\nnot a url\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("data:image/svg+xml;base64,").count(1));
    }

    #[test]
    fn resolve_without_urls_fails() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .arg("resolve")
            .write_stdin("")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No URLs given"));
    }

    #[test]
    fn candidates_lists_site_and_services() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["candidates", "https://www.example.com/page"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://www.example.com/favicon.ico"))
            .stdout(predicate::str::contains("https://example.com/favicon.ico"))
            .stdout(predicate::str::contains("google.com/s2/favicons"));
    }

    #[test]
    fn candidates_rejects_invalid_url() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["candidates", "example"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not an absolute URL"));
    }

    #[test]
    fn cache_path_uses_override() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("elsewhere");
        favi(&temp)
            .args(["--cache-dir", dir.to_str().unwrap(), "cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(dir.display().to_string()));
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        favi(&temp)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::diff("[]\n"));
    }

    #[test]
    fn cache_list_shows_persisted_entry() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("icons");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("favicon_example.com.json"),
            r#"{"domain":"example.com","icon":"data:image/png;base64,AA==","timestamp":1700000000000}"#,
        )
        .unwrap();

        favi(&temp)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("example.com"));

        favi(&temp)
            .args(["cache", "prune", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Dry run"));
        assert!(dir.join("favicon_example.com.json").exists());

        favi(&temp)
            .args(["cache", "prune"])
            .assert()
            .success()
            .stdout(predicate::str::contains("removed 1 icon(s)"));
        assert!(!dir.join("favicon_example.com.json").exists());
    }

    #[test]
    fn cache_clear_with_yes() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("icons");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("favicon_a.test.json"),
            r#"{"domain":"a.test","icon":"data:image/png;base64,AA==","timestamp":1700000000000}"#,
        )
        .unwrap();

        favi(&temp)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success();
        assert!(!dir.join("favicon_a.test.json").exists());
    }
}
