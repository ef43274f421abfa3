//! Integration tests for HelixDesk
//!
//! These tests drive the binary end to end and run the API server on an
//! ephemeral port against the real HTTP client and client stores.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a helixdesk Command that ignores the caller's environment
fn helixdesk(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("helixdesk");
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("HELIXDESK_CONFIG")
        .env_remove("HELIXDESK_PORT")
        .env_remove("HELIXDESK_HOST")
        .env_remove("HELIXDESK_DATA_FILE")
        .env_remove("HELIXDESK_LOG_JSON");
    cmd
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("serve"))
            .stdout(predicate::str::contains("init"));
    }

    #[test]
    fn test_version() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_serve_help_lists_flags() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .args(["serve", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--no-cors"))
            .stdout(predicate::str::contains("--data-file"));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .args(["--config", "absent.toml", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("absent.toml"));
    }
}

// =============================================================================
// Init Tests
// =============================================================================

mod init {
    use super::*;

    #[test]
    fn test_init_creates_default_data_file() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized HelixDesk data"));

        let raw = fs::read_to_string(dir.path().join(".helixdesk/db.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["customers"], serde_json::json!([]));
        assert_eq!(doc["kanban"]["columnOrder"], serde_json::json!([]));
    }

    #[test]
    fn test_init_seed() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .args(["init", "--seed", "--data-file", "data.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("3 customers"));

        let raw = fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert!(raw.contains("Reliance Industries"));
        assert!(raw.contains("In Progress"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.json"), "{}").unwrap();

        helixdesk(&dir)
            .args(["init", "--data-file", "data.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));
        assert_eq!(fs::read_to_string(dir.path().join("data.json")).unwrap(), "{}");

        helixdesk(&dir)
            .args(["init", "--seed", "--force", "--data-file", "data.json"])
            .assert()
            .success();
        assert!(fs::read_to_string(dir.path().join("data.json")).unwrap().contains("Tata"));
    }

    #[test]
    fn test_init_uses_data_file_from_env() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .env("HELIXDESK_DATA_FILE", "from-env.json")
            .arg("init")
            .assert()
            .success();
        assert!(dir.path().join("from-env.json").exists());
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_init_then_show() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));
        assert!(dir.path().join(".helixdesk/helixdesk.toml").exists());

        helixdesk(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("port = 3001"));
    }

    #[test]
    fn test_config_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        helixdesk(&dir).args(["config", "init"]).assert().success();
        helixdesk(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("custom.toml"),
            "[client]\napi_base_url = \"localhost:3001\"\n",
        )
        .unwrap();
        helixdesk(&dir)
            .args(["--config", "custom.toml", "config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("api_base_url"));
    }

    #[test]
    fn test_config_file_drives_init_path() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("custom.toml"),
            "[server]\ndata_file = \"configured.json\"\n",
        )
        .unwrap();
        helixdesk(&dir)
            .args(["--config", "custom.toml", "init"])
            .assert()
            .success();
        assert!(dir.path().join("configured.json").exists());
    }
}

// =============================================================================
// End-to-end: server + HTTP client + client stores
// =============================================================================

mod end_to_end {
    use super::*;
    use helixdesk::backend::server::{ServerConfig, app, serve_on};
    use helixdesk::backend::store::FlatFileStore;
    use helixdesk::client::customers::CustomerStore;
    use helixdesk::client::kanban::KanbanStore;
    use helixdesk::client::user::UserStore;
    use helixdesk::client::{DashboardApi, HttpApi, SyncOutcome};
    use helixdesk::errors::ClientError;
    use helixdesk::models::UserProfile;
    use helixdesk::seed;
    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    struct Running {
        _dir: TempDir,
        api: HttpApi,
        data_file: std::path::PathBuf,
        shutdown: Option<oneshot::Sender<()>>,
        handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    }

    impl Running {
        async fn stop(mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
            self.handle.await.unwrap().unwrap();
        }
    }

    async fn start(seeded: bool) -> Running {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("db.json");
        if seeded {
            FlatFileStore::open(&data_file)
                .unwrap()
                .write(&seed::demo_document())
                .unwrap();
        }
        let config = ServerConfig {
            data_file: data_file.clone(),
            port: 0,
            ..Default::default()
        };
        let router = app(&config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve_on(listener, router, async {
            let _ = rx.await;
        }));

        Running {
            _dir: dir,
            api: HttpApi::new(format!("http://{}/api", addr)),
            data_file,
            shutdown: Some(tx),
            handle,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = start(false).await;
        let health = server.api.health().await.unwrap();
        assert_eq!(health.status, "OK");
        assert_eq!(health.message, "HelixDesk API is running");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_kanban_flow_persists_to_disk() {
        let server = start(true).await;
        let mut store = KanbanStore::default();
        store.load(&server.api).await.unwrap();
        assert_eq!(store.board.column_order, vec!["todo", "in-progress", "done"]);

        let (task, outcome) = store
            .add_task(&server.api, "todo", "Call Infosys")
            .await
            .unwrap();
        assert!(outcome.is_committed());

        let index = store.board.columns["in-progress"].task_ids.len();
        store
            .move_task(&server.api, &task.id, "todo", "in-progress", index)
            .await
            .unwrap();
        store.toggle_task(&server.api, &task.id).await.unwrap();
        store.delete_task(&server.api, "task-5").await.unwrap();
        let (column, _) = store.add_column(&server.api, "Blocked").await.unwrap();

        let server_board = server.api.fetch_kanban().await.unwrap();
        assert_eq!(server_board, store.board);
        assert!(server_board.tasks[&task.id].completed);
        assert_eq!(server_board.columns["in-progress"].task_ids.last(), Some(&task.id));
        assert!(server_board.dangling_references().is_empty());
        assert_eq!(server_board.column_order.last(), Some(&column.id));

        let on_disk = FlatFileStore::open(&server.data_file).unwrap().read().unwrap();
        assert_eq!(on_disk.kanban, server_board);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_failed_write_resyncs_from_server() {
        let server = start(true).await;
        let mut store = KanbanStore::default();
        store.load(&server.api).await.unwrap();

        // Another client removes the column; our stale move answers 404.
        FlatFileStore::open(&server.data_file)
            .unwrap()
            .write(&{
                let mut doc = seed::demo_document();
                doc.kanban.columns.shift_remove("done");
                doc.kanban.column_order.retain(|c| c != "done");
                doc
            })
            .unwrap();

        let outcome = store
            .move_task(&server.api, "task-1", "todo", "done", 0)
            .await
            .unwrap();
        match outcome {
            SyncOutcome::Resynced { cause } => match cause {
                ClientError::Status { status, message } => {
                    assert_eq!(status, 404);
                    assert_eq!(message, "Column not found");
                }
                other => panic!("unexpected cause {:?}", other),
            },
            SyncOutcome::Committed => panic!("move should have been rejected"),
        }
        assert!(!store.board.columns.contains_key("done"));
        assert_eq!(store.board.columns["todo"].task_ids[0], "task-1");
        assert_eq!(store.board, server.api.fetch_kanban().await.unwrap());
        server.stop().await;
    }

    #[tokio::test]
    async fn test_customers_flow() {
        let server = start(true).await;
        let mut store = CustomerStore::default();
        store.load(&server.api).await.unwrap();
        assert_eq!(store.active_customer().unwrap().name, "Reliance Industries");

        store.next();
        store
            .update_customer(&server.api, "2", json!({"status": "At risk"}))
            .await
            .unwrap();

        let customers = server.api.fetch_customers().await.unwrap();
        assert_eq!(customers[1].status, "At risk");
        assert_eq!(customers[1].segment, "Strategic");
        assert_eq!(store.active_customer_id.as_deref(), Some("2"));

        let err = server
            .api
            .update_customer("999", &json!({"name": "Ghost"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, ref message } if message == "Customer not found"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_ids_with_reserved_characters_reach_their_customer() {
        let server = start(true).await;
        let mut doc = seed::demo_document();
        doc.customers.push(helixdesk::models::Customer {
            id: "acme/emea?q#1".into(),
            name: "Acme EMEA".into(),
            ..Default::default()
        });
        FlatFileStore::open(&server.data_file)
            .unwrap()
            .write(&doc)
            .unwrap();

        let customer = server
            .api
            .update_customer("acme/emea?q#1", &json!({"status": "Active"}))
            .await
            .unwrap();
        assert_eq!(customer.id, "acme/emea?q#1");
        assert_eq!(customer.name, "Acme EMEA");

        let on_disk = FlatFileStore::open(&server.data_file).unwrap().read().unwrap();
        assert_eq!(on_disk.customer("acme/emea?q#1").unwrap().status, "Active");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_user_profile_round_trip() {
        let server = start(false).await;
        let mut store = UserStore::default();
        store.set_user(UserProfile {
            id: "u-1".into(),
            name: "Asha".into(),
            username: "asha".into(),
            email: "asha@example.com".into(),
            photo: None,
        });

        let outcome = store
            .update_profile(&server.api, json!({"email": "asha@helix.dev"}))
            .await
            .unwrap();
        assert!(outcome.is_committed());

        let raw = fs::read_to_string(&server.data_file).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["users"]["u-1"]["email"], "asha@helix.dev");
        assert_eq!(doc["users"]["u-1"]["id"], "u-1");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_photo_upload_round_trip() {
        let server = start(false).await;
        let mut store = UserStore::default();
        store.set_user(UserProfile {
            id: "u-1".into(),
            name: "Asha".into(),
            ..Default::default()
        });

        let image = b"GIF89a tiny".to_vec();
        let url = store
            .upload_photo(&server.api, "avatar.gif", image.clone())
            .await
            .unwrap();
        assert_eq!(store.user.as_ref().unwrap().photo.as_deref(), Some(url.as_str()));

        let origin = server.api.base_url().trim_end_matches("/api");
        let resp = reqwest::get(format!("{}{}", origin, url)).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "image/gif");
        assert_eq!(resp.bytes().await.unwrap().to_vec(), image);

        let raw = fs::read_to_string(&server.data_file).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["users"]["u-1"]["photo"], url.as_str());
        server.stop().await;
    }
}
