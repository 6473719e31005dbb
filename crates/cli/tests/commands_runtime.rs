use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use caddie_cli::commands::browse::BrowseArgs;
use caddie_cli::commands::{bag, browse, config, lofts, migrate, seed};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_invalid_page_size() {
    let workspace = Workspace::new();
    workspace.run(&[("CADDIE_CATALOG_DEFAULT_PAGE_SIZE", "30")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_loads_bundled_catalog_and_is_idempotent() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        let first = seed::run(None);
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["command"], "seed");
        assert_eq!(first_payload["data"]["clubs_loaded"], 18);

        let second = seed::run(None);
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);

        assert_eq!(first_payload["message"], second_payload["message"]);
        assert_eq!(first_payload["data"], second_payload["data"]);
    });
}

#[test]
fn seed_reports_skipped_variants_from_a_custom_file() {
    let workspace = Workspace::new();
    let file = workspace.write(
        "clubs.json",
        r#"{"clubs":[{"type":"Wedge","specifictype":"Sand Wedge","brand":"Cleveland",
            "model":"RTX 6","variants":[{"loft":"56°","price":"$149.99"},
            {"loft":"58°","price":"call us"}]}]}"#,
    );
    workspace.run(&[], || {
        let result = seed::run(Some(&file));
        assert_eq!(result.exit_code, 0, "expected custom seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["clubs_loaded"], 1);
        assert_eq!(payload["data"]["variants_loaded"], 1);
        assert_eq!(payload["data"]["skipped"].as_array().map(Vec::len), Some(1));
    });
}

#[test]
fn seed_rejects_unparseable_file() {
    let workspace = Workspace::new();
    let file = workspace.write("broken.json", "{ not json");
    workspace.run(&[], || {
        let result = seed::run(Some(&file));
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "seed_input");
    });
}

#[test]
fn browse_filters_sorts_and_pages_the_seeded_catalog() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        assert_eq!(seed::run(None).exit_code, 0);

        let args = BrowseArgs {
            category: Some("Wedge".to_string()),
            sort: Some("price-asc".to_string()),
            page_size: Some(25),
            ..BrowseArgs::default()
        };
        let result = browse::run(&args);
        assert_eq!(result.exit_code, 0, "expected browse success: {}", result.output);

        let payload = parse_payload(&result.output);
        let page = &payload["data"];
        assert_eq!(page["page"], 1);
        assert_eq!(page["page_size"], 25);

        let items = page["items"].as_array().expect("items");
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item["type"] == "Wedge"));

        let prices = items
            .iter()
            .filter_map(|item| item["variants"][0]["price"].as_f64())
            .collect::<Vec<_>>();
        assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]), "{prices:?}");
    });
}

#[test]
fn browse_rejects_invalid_arguments() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        let args = BrowseArgs { sort: Some("newest".to_string()), ..BrowseArgs::default() };
        let result = browse::run(&args);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_argument");

        let args = BrowseArgs { page_size: Some(10), ..BrowseArgs::default() };
        let result = browse::run(&args);
        assert_eq!(result.exit_code, 2);
    });
}

#[test]
fn browse_reports_unreachable_remote_catalog() {
    let address = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr")
    };
    let remote = format!("http://{address}");
    let workspace = Workspace::new();
    workspace.run(&[("CADDIE_CATALOG_REMOTE_URL", remote.as_str())], || {
        let result = browse::run(&BrowseArgs::default());
        assert_eq!(result.exit_code, 6, "expected unavailable catalog: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog_unavailable");
    });
}

#[test]
fn saved_lofts_round_trip_and_narrow_browse() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        let saved = lofts::run(&["46".to_string(), "56°".to_string(), "99".to_string()], true);
        assert_eq!(saved.exit_code, 0, "expected lofts save success");
        let payload = parse_payload(&saved.output);
        assert_eq!(payload["data"]["lofts"], serde_json::json!([46.0, 56.0]));
        assert_eq!(payload["data"]["recommended"], serde_json::json!([51.0]));

        let loaded = parse_payload(&lofts::run(&[], false).output);
        assert_eq!(loaded["data"]["lofts"], serde_json::json!([46.0, 56.0]));
        assert_eq!(loaded["data"]["saved"], false);

        assert_eq!(seed::run(None).exit_code, 0);
        let args = BrowseArgs { use_saved_lofts: true, ..BrowseArgs::default() };
        let page = parse_payload(&browse::run(&args).output);
        let items = page["data"]["items"].as_array().expect("items");
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| item["type"] == "Wedge"), "{items:?}");
    });
}

#[test]
fn lofts_save_without_values_is_rejected() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        let result = lofts::run(&[], true);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_argument");
    });
}

#[test]
fn lofts_save_with_only_invalid_values_keeps_saved_lofts() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        assert_eq!(lofts::run(&["46".to_string(), "56".to_string()], true).exit_code, 0);

        let result = lofts::run(&["80".to_string(), "abc".to_string()], true);
        assert_eq!(result.exit_code, 2, "expected rejection: {}", result.output);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_argument");

        let loaded = parse_payload(&lofts::run(&[], false).output);
        assert_eq!(loaded["data"]["lofts"], serde_json::json!([46.0, 56.0]));
    });
}

#[test]
fn bag_reports_gaps_rejections_and_checkout() {
    let workspace = Workspace::new();
    workspace.run(&[], || {
        assert_eq!(seed::run(None).exit_code, 0);

        let result = bag::run(&[1101, 1501, 1501, 999_999]);
        assert_eq!(result.exit_code, 0, "expected bag success: {}", result.output);

        let data = &parse_payload(&result.output)["data"];
        assert_eq!(data["report"]["sorted_bag"].as_array().map(Vec::len), Some(2));
        assert_eq!(data["report"]["gaps"].as_array().map(Vec::len), Some(1));
        assert_eq!(data["report"]["recommendations"][0]["candidate"]["id"], 1301);
        assert_eq!(data["rejected"].as_array().map(Vec::len), Some(1));
        assert_eq!(data["rejected"][0]["variant_id"], 999_999);
        assert_eq!(data["checkout"]["lines"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn config_attributes_values_to_their_source() {
    let workspace = Workspace::new();
    workspace.run(&[("CADDIE_SERVER_PORT", "9090")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("- server.port = 9090 (source: env (CADDIE_SERVER_PORT))"));
        assert!(message.contains("- logging.format = compact (source: default)"));
    });
}

#[test]
fn config_returns_failure_for_invalid_env() {
    let workspace = Workspace::new();
    workspace.run(&[("CADDIE_SERVER_PORT", "not-a-port")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

/// A scratch directory holding the catalog database and saved preferences.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    fn run(&self, extra: &[(&str, &str)], test_fn: impl FnOnce()) {
        let database_url = sqlite_url(&self.dir.path().join("caddie.db"));
        let preferences = self.dir.path().join("preferences");
        let preferences = preferences.display().to_string();

        let mut vars = vec![
            ("CADDIE_DATABASE_URL", database_url.as_str()),
            ("CADDIE_PREFERENCES_DIRECTORY", preferences.as_str()),
        ];
        vars.extend_from_slice(extra);
        with_env(&vars, test_fn);
    }
}

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "CADDIE_DATABASE_URL",
        "CADDIE_DATABASE_MAX_CONNECTIONS",
        "CADDIE_DATABASE_TIMEOUT_SECS",
        "CADDIE_SERVER_BIND_ADDRESS",
        "CADDIE_SERVER_PORT",
        "CADDIE_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "CADDIE_CATALOG_DEFAULT_PAGE_SIZE",
        "CADDIE_CATALOG_IMAGE_DIR",
        "CADDIE_CATALOG_REMOTE_URL",
        "CADDIE_PREFERENCES_DIRECTORY",
        "CADDIE_LOGGING_LEVEL",
        "CADDIE_LOGGING_FORMAT",
        "CADDIE_LOG_LEVEL",
        "CADDIE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
