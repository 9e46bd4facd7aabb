//! End-to-end tests for the `kiln` binary.

use std::{fs, path::Path};

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

/// A `kiln` command isolated from the user's config, environment and cwd.
fn kiln(home: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("kiln");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("KILN_GENERATION__REGISTER")
        .env_remove("KILN_GENERATION__OVERWRITE")
        .env_remove("KILN_OUTPUT__FORMAT");
    cmd
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn generate_page_writes_files_and_registry() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "page", "Invoice", "--store", "--no-format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/pages/InvoicePage/InvoicePage.tsx"));

    let page = read(temp.path(), "src/pages/InvoicePage/InvoicePage.tsx");
    assert!(page.contains("InvoicePage"));
    assert!(!page.contains("{{"));
    assert!(temp.path().join("src/pages/InvoicePage/InvoicePage.test.tsx").is_file());
    assert!(temp.path().join("src/pages/InvoicePage/index.ts").is_file());

    let routes = read(temp.path(), "src/routes.tsx");
    assert!(routes.contains("import { InvoicePage } from '@/pages/InvoicePage';"));
    assert!(routes.contains("path: '/invoice',"));
}

#[test]
fn second_run_does_not_duplicate_route() {
    let temp = TempDir::new().unwrap();
    for _ in 0..2 {
        kiln(temp.path())
            .args(["g", "page", "Invoice", "--no-format"])
            .assert()
            .success();
    }
    let routes = read(temp.path(), "src/routes.tsx");
    assert_eq!(routes.matches("path: '/invoice'").count(), 1);
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "store", "Invoice", "--api", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would write"))
        .stdout(predicate::str::contains("invoiceApi.ts"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn store_without_api_still_writes_api_client() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "store", "Invoice", "--no-format"])
        .assert()
        .success();

    assert!(temp.path().join("src/api/invoiceApi.ts").is_file());
    let store = read(temp.path(), "src/stores/InvoiceStore.ts");
    assert!(!store.contains("../api/invoiceApi"));
}

#[test]
fn json_report_on_stdout() {
    let temp = TempDir::new().unwrap();
    let out = kiln(temp.path())
        .args([
            "--output-format",
            "json",
            "generate",
            "component",
            "OrderItem",
            "--styled",
            "--no-format",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["kind"], "component");
    assert_eq!(report["identifiers"]["pascalName"], "OrderItem");
    assert_eq!(report["registry"]["status"], "not_applicable");
    assert_eq!(report["artifacts"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["artifacts"][0]["outcome"], "created");
}

#[test]
fn invalid_name_exits_with_user_error() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "component", "9lives", "--no-format"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("9lives"));
    assert!(!temp.path().join("src").exists());
}

#[test]
fn option_of_another_kind_is_rejected() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "page", "Invoice", "--antd", "--no-format"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("antd"));
}

#[test]
fn overwrite_error_policy_refuses_existing_files() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "service", "Invoice", "--no-format"])
        .assert()
        .success();
    fs::write(temp.path().join("src/services/InvoiceService.ts"), "// edited\n").unwrap();

    kiln(temp.path())
        .args(["generate", "service", "Invoice", "--no-format", "--overwrite", "error"])
        .assert()
        .code(2);
    assert_eq!(read(temp.path(), "src/services/InvoiceService.ts"), "// edited\n");

    kiln(temp.path())
        .args(["generate", "service", "Invoice", "--no-format", "--overwrite", "skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kept existing"));
    assert_eq!(read(temp.path(), "src/services/InvoiceService.ts"), "// edited\n");
}

#[test]
fn template_override_directory_is_used() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".kiln/templates/component");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("component.hbs"), "// custom {{pascalName}}\n").unwrap();

    kiln(temp.path())
        .args(["generate", "component", "Button", "--no-format"])
        .assert()
        .success();
    assert_eq!(
        read(temp.path(), "src/components/Button/Button.tsx"),
        "// custom Button\n"
    );
}

#[test]
fn env_disables_registration() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .env("KILN_GENERATION__REGISTER", "false")
        .args(["generate", "page", "Invoice", "--no-format"])
        .assert()
        .success();
    assert!(temp.path().join("src/pages/InvoicePage/InvoicePage.tsx").is_file());
    assert!(!temp.path().join("src/routes.tsx").exists());
}

#[test]
fn local_config_file_is_honoured() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kiln.toml"),
        "[generation]\nregistry_path = \"src/router.tsx\"\n",
    )
    .unwrap();

    kiln(temp.path())
        .args(["generate", "page", "Invoice", "--no-format"])
        .assert()
        .success();
    assert!(temp.path().join("src/router.tsx").is_file());
}

#[test]
fn list_json_describes_every_kind() {
    let temp = TempDir::new().unwrap();
    let out = kiln(temp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let kinds: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<_> = kinds
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["component", "store", "service", "page"]);
}

#[test]
fn list_csv_filtered_by_kind() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["list", "--kind", "store", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind,template,origin"))
        .stdout(predicate::str::contains("store,api-client,builtin"))
        .stdout(predicate::str::contains("page,").not());
}

#[test]
fn init_local_then_config_set_and_get() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path()).args(["init", "--local"]).assert().success();
    assert!(temp.path().join("kiln.toml").is_file());

    kiln(temp.path())
        .args(["config", "set", "generation.overwrite", "skip"])
        .assert()
        .success();
    kiln(temp.path())
        .args(["config", "get", "generation.overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::diff("skip\n"));

    kiln(temp.path())
        .args(["config", "set", "generation.overwrite", "sometimes"])
        .assert()
        .code(4);
}

#[test]
fn config_path_prefers_explicit_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("custom.toml");
    fs::write(&file, "").unwrap();
    kiln(temp.path())
        .args(["--config", file.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln"));
}

#[test]
fn unknown_kind_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    kiln(temp.path())
        .args(["generate", "widget", "Invoice"])
        .assert()
        .code(2);
}
