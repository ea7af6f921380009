//! End-to-end reset scenarios through the product surface, against
//! synthetic configuration trees and an in-memory registry.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use filetime::FileTime;
use retrial::jetbrains::engine::EnginePaths;
use retrial::jetbrains::JetBrains;
use retrial::product::TrialProduct;
use retrial::registry::MemoryRegistry;
use retrial::registry::RegistryStore;
use retrial::report::NOTHING_TO_DO;
use serde_json::Value;
use tempfile::TempDir;

struct Setup {
    _dir: TempDir,
    paths: EnginePaths,
    registry: Arc<MemoryRegistry>,
    product: JetBrains,
}

fn setup() -> Setup {
    let dir = TempDir::new().unwrap();
    let paths = EnginePaths {
        roaming_root: dir.path().join("roaming").join("JetBrains"),
        local_root: dir.path().join("local").join("JetBrains"),
        home_dir: dir.path().join("home"),
        staging_dir: dir.path().join("backup").join("jetbrains"),
    };
    fs::create_dir_all(&paths.home_dir).unwrap();

    let registry = Arc::new(MemoryRegistry::new());
    let product = JetBrains::with_paths(paths.clone(), Box::new(Arc::clone(&registry)));
    Setup {
        _dir: dir,
        paths,
        registry,
        product,
    }
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn pristine_system_is_exactly_nothing_to_do() {
    let setup = setup();

    assert_eq!(setup.product.perform_reset(), NOTHING_TO_DO);
}

#[test]
fn registry_without_install_yields_a_single_entry() {
    let setup = setup();
    setup.registry.add_key(r"Software\JavaSoft\Prefs\jetbrains\idea");

    let summary = setup.product.perform_reset();

    assert_eq!(summary, "registry: JavaSoft");
    assert!(!setup.registry.subkey_exists(r"Software\JavaSoft"));
}

#[test]
fn preserved_items_round_trip_byte_identically() {
    let setup = setup();
    let variant = setup.paths.roaming_root.join("WebStorm2024.2");
    write(&variant.join("options").join("editor.xml"), b"<editor tabs=\"2\"/>");
    write(&variant.join("plugins").join("vim").join("vim.jar"), b"\x50\x4b\x03\x04jar");
    write(&variant.join("randomCache").join("index.bin"), b"cache");

    let stamp = FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(variant.join("options").join("editor.xml"), stamp).unwrap();

    setup.product.perform_reset();

    let rebuilt = setup.paths.roaming_root.join("WebStorm2024.2");
    assert_eq!(
        fs::read(rebuilt.join("options").join("editor.xml")).unwrap(),
        b"<editor tabs=\"2\"/>"
    );
    assert_eq!(
        fs::read(rebuilt.join("plugins").join("vim").join("vim.jar")).unwrap(),
        b"\x50\x4b\x03\x04jar"
    );
    assert!(!rebuilt.join("randomCache").exists());

    let restored_stamp = FileTime::from_last_modification_time(
        &fs::metadata(rebuilt.join("options").join("editor.xml")).unwrap(),
    );
    assert_eq!(restored_stamp.unix_seconds(), stamp.unix_seconds());
}

#[test]
fn embedded_property_map_is_reduced_to_user_settings() {
    let setup = setup();
    let body = r#"{"keyToString": {"evlKey1": "x", "trial.count": "5", "normalSetting": "y", "foo.runnable": "z"}}"#;
    let xml = format!(
        "<application>\n  <component name=\"PropertyService\"><![CDATA[{body}]]></component>\n</application>"
    );
    write(
        &setup
            .paths
            .roaming_root
            .join("IntelliJIdea2024.1")
            .join("options")
            .join("other.xml"),
        xml.as_bytes(),
    );

    setup.product.perform_reset();

    let restored = fs::read_to_string(
        setup
            .paths
            .roaming_root
            .join("IntelliJIdea2024.1")
            .join("options")
            .join("other.xml"),
    )
    .unwrap();
    let cdata_start = restored.find("<![CDATA[").unwrap() + "<![CDATA[".len();
    let cdata_end = restored.find("]]>").unwrap();
    let doc: Value = serde_json::from_str(&restored[cdata_start..cdata_end]).unwrap();

    let map = doc["keyToString"].as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["normalSetting"], "y");
}

#[test]
fn second_reset_runs_against_the_restored_tree() {
    let setup = setup();
    setup.registry.add_key(r"Software\JavaSoft\Prefs");
    let variant = setup.paths.roaming_root.join("GoLand2024.1");
    write(&variant.join("options").join("editor.xml"), b"<e/>");
    write(&variant.join("eval").join("key.evaluation"), b"k");

    let first = setup.product.perform_reset();
    assert!(first.contains("AppData/JetBrains"));
    assert!(first.contains("registry: JavaSoft"));

    let second = setup.product.perform_reset();

    // The restore recreated the roaming root, so the second pass wipes and
    // restores again but finds no registry key and no trial files.
    assert!(second.contains("AppData/JetBrains"));
    assert!(second.contains("restored: "));
    assert!(!second.contains("registry"));
    assert!(setup
        .paths
        .roaming_root
        .join("GoLand2024.1")
        .join("options")
        .join("editor.xml")
        .exists());
    assert!(!setup.paths.roaming_root.join("GoLand2024.1").join("eval").exists());
}

#[test]
fn local_caches_and_legacy_folders_are_cleared_in_one_pass() {
    let setup = setup();
    write(&setup.paths.roaming_root.join("CLion2024.2").join("options").join("a.xml"), b"x");
    write(&setup.paths.local_root.join("CLion2024.2").join("caches").join("idx"), b"x");
    write(&setup.paths.local_root.join("Toolbox").join("state.json"), b"{}");
    let legacy = setup.paths.home_dir.join(".PyCharm2019.2");
    write(&legacy.join("config").join("eval").join("key"), b"x");
    write(&legacy.join("config").join("options").join("other.xml"), b"<x/>");
    write(&legacy.join("config").join("keymaps").join("my.xml"), b"<k/>");

    let summary = setup.product.perform_reset();

    assert!(summary.contains("Local/CLion2024.2"));
    assert!(summary.contains(".PyCharm2019.2/eval"));
    assert!(summary.contains(".PyCharm2019.2/other.xml"));
    assert!(setup.paths.local_root.join("Toolbox").exists());
    assert!(legacy.join("config").join("keymaps").join("my.xml").exists());
}
