use depositslip_core::{Account, AccountError};
use depositslip_printing::LayoutConfiguration;
use depositslip_settings::{default_config_path, ConfigError, ConfigurationStore};
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = r#"{
    "accounts": [
        {"account": "4567", "name": "Jane Doe", "description": "Checking", "routing": "011000015"},
        {"account": "8910", "name": "Doe Household", "routing": "021000021"}
    ],
    "configuration": {
        "sans_font": "Helvetica",
        "sans_font_size": 11.0,
        "mono_font": "Courier",
        "mono_font_size": 10.0,
        "micr_font": "GnuMICR",
        "label_scale": 0.6,
        "print_name_account_labels": false,
        "front": {
            "label_x": 20, "value_x": 80, "name_y": 50, "account_y": 72, "date_y": 94,
            "micr_x": 50, "micr_y": 186, "first_amount_y": 50, "amount_pitch": 21,
            "subtotal_y": 92, "total_y": 132, "amount_x": 420
        },
        "back": {"amount_x": 180, "first_amount_y": 20, "amount_pitch": 17, "total_y": 400}
    }
}"#;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = default_config_path(temp.path());

    let store = ConfigurationStore::load(&path).expect("load defaults");
    assert!(store.accounts().is_empty());
    assert_eq!(store.layout(), &LayoutConfiguration::default());
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn load_reads_accounts_and_layout() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE).expect("write sample");

    let store = ConfigurationStore::load(&path).expect("load sample");
    let accounts: Vec<_> = store.accounts().iter().map(|a| a.number.as_str()).collect();
    assert_eq!(accounts, vec!["4567", "8910"]);
    assert_eq!(store.accounts().get("4567").unwrap().description, "Checking");
    assert_eq!(store.accounts().get("8910").unwrap().description, "");

    let layout = store.layout();
    assert_eq!(layout.fonts.sans_family, "Helvetica");
    assert!(!layout.fonts.print_name_account_labels);
    assert_eq!(layout.front.name_y, 50.0);
    assert_eq!(layout.back.total_y, 400.0);
    assert_eq!(
        layout.front.underline_width,
        LayoutConfiguration::default().front.underline_width
    );
}

#[test]
fn missing_required_field_is_fatal() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE.replace(r#""name_y": 50, "#, "")).expect("write");

    let err = ConfigurationStore::load(&path).expect_err("missing field");
    match err {
        ConfigError::MissingField { field } => assert_eq!(field, "configuration.front.name_y"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn duplicate_accounts_are_rejected() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE.replace("8910", "4567")).expect("write");

    let err = ConfigurationStore::load(&path).expect_err("duplicate");
    assert!(matches!(
        err,
        ConfigError::Account(AccountError::Duplicate(ref number)) if number == "4567"
    ));
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = default_config_path(temp.path());

    let mut store = ConfigurationStore::load(&path).expect("defaults");
    store
        .add_account(Account::new("4567", "Jane Doe", "011000015").with_description("Checking"))
        .expect("add account");
    let mut layout = store.layout().clone();
    layout.front.total_y = 140.0;
    store.set_layout(layout).expect("save layout");

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = ConfigurationStore::load(&path).expect("reload");
    assert_eq!(reloaded.configuration(), store.configuration());
    assert_eq!(reloaded.layout().front.total_y, 140.0);
}

#[test]
fn reset_layout_keeps_accounts() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE).expect("write sample");

    let mut store = ConfigurationStore::load(&path).expect("load");
    store.reset_layout().expect("reset");

    let reloaded = ConfigurationStore::load(&path).expect("reload");
    assert_eq!(reloaded.layout(), &LayoutConfiguration::default());
    assert_eq!(reloaded.accounts().len(), 2);
}

#[test]
fn remove_unknown_account_reports_not_found() {
    let temp = tempdir().expect("tempdir");
    let mut store = ConfigurationStore::load(temp.path().join("config.json")).expect("load");
    let err = store.remove_account("0000").expect_err("unknown");
    assert!(matches!(err, ConfigError::Account(AccountError::NotFound(_))));
}

#[test]
fn import_from_backs_up_previous_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    let mut store = ConfigurationStore::load(&path).expect("defaults");
    store
        .add_account(Account::new("1111", "Old", "000000000"))
        .expect("seed");

    let incoming = temp.path().join("incoming.json");
    fs::write(&incoming, SAMPLE).expect("write incoming");
    store.import_from(&incoming).expect("import");

    assert_eq!(store.accounts().len(), 2);
    let backup = fs::read_to_string(path.with_extension("bak")).expect("backup exists");
    assert!(backup.contains("\"1111\""));

    let exported = temp.path().join("exports/copy.json");
    store.export_to(&exported).expect("export");
    let copy = ConfigurationStore::load(&exported).expect("load export");
    assert_eq!(copy.configuration(), store.configuration());
}

#[test]
fn invalid_import_leaves_store_untouched() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE).expect("write sample");
    let mut store = ConfigurationStore::load(&path).expect("load");

    let incoming = temp.path().join("broken.json");
    fs::write(&incoming, r#"{"accounts": []}"#).expect("write broken");
    let err = store.import_from(&incoming).expect_err("missing configuration");
    assert!(matches!(err, ConfigError::MissingField { ref field } if field == "configuration"));
    assert_eq!(store.accounts().len(), 2);
    assert!(!path.with_extension("bak").exists());
}

#[test]
fn legacy_tsv_import_merges_accounts() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.json");
    fs::write(&path, SAMPLE).expect("write sample");
    let mut store = ConfigurationStore::load(&path).expect("load");

    let legacy = temp.path().join("accounts.tsv");
    fs::write(
        &legacy,
        "# exported accounts\n4567\tJane Doe\tChecking\t011000015\n\n2222\tPetty Cash\t031000053\n",
    )
    .expect("write tsv");

    let added = store.import_accounts_tsv(&legacy).expect("import tsv");
    assert_eq!(added, 1);
    let reloaded = ConfigurationStore::load(&path).expect("reload");
    let petty = reloaded.accounts().get("2222").expect("imported account");
    assert_eq!(petty.routing_number, "031000053");
    assert_eq!(reloaded.accounts().len(), 3);
}

#[test]
fn malformed_tsv_names_the_file() {
    let temp = tempdir().expect("tempdir");
    let mut store = ConfigurationStore::load(temp.path().join("config.json")).expect("load");
    let legacy = temp.path().join("accounts.tsv");
    fs::write(&legacy, "4567\tJane Doe\n").expect("write tsv");

    let err = store.import_accounts_tsv(&legacy).expect_err("malformed");
    assert!(err.to_string().contains("accounts.tsv"), "{err}");
    assert!(matches!(
        err,
        ConfigError::Import {
            source: AccountError::MalformedRecord { line: 1, found: 2, .. },
            ..
        }
    ));
}
