use assert_cmd::Command;

#[test]
fn help_lists_subcommands() {
    let output = Command::cargo_bin("biblio")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["serve", "list", "add", "delete", "lookup"] {
        assert!(stdout.contains(sub), "missing {sub} in help");
    }
}

#[test]
fn lookup_without_title_fails_offline() {
    Command::cargo_bin("biblio")
        .unwrap()
        .env("BIBLIO_ENV", "local")
        .env("BIBLIO_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .args(["lookup", "   "])
        .assert()
        .failure();
}
