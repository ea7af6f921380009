//! Fixed lookup tables for the IDE family reset.
//!
//! These are data, not logic: the terminator, classifier, and engine all
//! consume them, and tests exercise the pipeline against synthetic trees
//! without touching the tables themselves.

/// Image names of every killable IDE process, including the toolbox
/// launcher. Matched case-insensitively against the live process table.
pub const PROCESS_NAMES: &[&str] = &[
    "pycharm64.exe",
    "pycharm.exe",
    "webstorm64.exe",
    "webstorm.exe",
    "idea64.exe",
    "idea.exe",
    "clion64.exe",
    "clion.exe",
    "rider64.exe",
    "rider.exe",
    "goland64.exe",
    "goland.exe",
    "phpstorm64.exe",
    "phpstorm.exe",
    "rubymine64.exe",
    "rubymine.exe",
    "datagrip64.exe",
    "datagrip.exe",
    "aqua64.exe",
    "aqua.exe",
    "rustrover64.exe",
    "rustrover.exe",
    "fleet.exe",
    "dataspell64.exe",
    "dataspell.exe",
    "jetbrains-toolbox.exe",
];

/// Variant config subitems that hold genuine user customization.
///
/// Everything in a variant folder that is NOT named here is treated as
/// trial/identity state and destroyed with the family tree. The wipe never
/// enumerates that state individually; preservation is the allow-list.
pub const PRESERVE_ITEMS: &[&str] = &[
    "options",       // settings
    "codestyles",    // formatting rules
    "colors",        // color schemes
    "keymaps",       // keyboard shortcuts
    "templates",     // live templates
    "fileTemplates", // file templates
    "scratches",     // scratch files
    "consoles",      // database consoles
    "jdbc-drivers",  // database drivers
    "extensions",
    "settingsSync",
    "quicklists",
    "shelf",         // shelved changes
    "tasks",
    "workspace",     // workspace files
    "plugins",       // user-installed plugins
    "inspection",    // inspection profiles
    "grazie",        // grammar-check data
];

/// Folder-name prefixes identifying product variants under the family
/// roots. Case-sensitive, e.g. `PyCharm2024.1`.
pub const VARIANT_PREFIXES: &[&str] = &[
    "PyCharm",
    "WebStorm",
    "IntelliJ",
    "CLion",
    "Rider",
    "GoLand",
    "PhpStorm",
    "RubyMine",
    "DataGrip",
    "Aqua",
    "RustRover",
    "Fleet",
    "DataSpell",
    "Resharper",
    "dotMemory",
    "dotTrace",
];

/// Short names used by legacy installs that kept dot-folders directly in
/// the user's home directory (`.WebStorm2019.3` and the like).
pub const LEGACY_SHORT_NAMES: &[&str] = &[
    "WebStorm",
    "IntelliJ",
    "CLion",
    "Rider",
    "GoLand",
    "PhpStorm",
    "Resharper",
    "PyCharm",
    "DataGrip",
];

/// Registry subtree holding JVM/launcher identity fingerprints. Deleted
/// wholesale, never backed up.
pub const IDENTITY_SUBTREE: &str = r"Software\JavaSoft";

/// True if a directory name under a family root is a recognized product
/// variant folder.
#[must_use]
pub fn is_recognized_variant(name: &str) -> bool {
    VARIANT_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// True if a variant subitem name is on the preserve allow-list.
#[must_use]
pub fn is_preserve_item(name: &str) -> bool {
    PRESERVE_ITEMS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_versioned_variant_folders() {
        assert!(is_recognized_variant("PyCharm2024.1"));
        assert!(is_recognized_variant("IntelliJIdea2023.3"));
        assert!(is_recognized_variant("RustRover2024.2"));
        assert!(is_recognized_variant("dotTrace2023.2"));
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        assert!(!is_recognized_variant("pycharm2024.1"));
        assert!(!is_recognized_variant("PYCHARM2024.1"));
    }

    #[test]
    fn rejects_unrelated_folders() {
        assert!(!is_recognized_variant("consentOptions"));
        assert!(!is_recognized_variant("Toolbox"));
        assert!(!is_recognized_variant(""));
    }

    #[test]
    fn preserve_list_covers_user_state_not_identity() {
        assert!(is_preserve_item("options"));
        assert!(is_preserve_item("plugins"));
        assert!(is_preserve_item("jdbc-drivers"));
        assert!(!is_preserve_item("eval"));
        assert!(!is_preserve_item("port"));
        assert!(!is_preserve_item("randomCache"));
    }

    #[test]
    fn table_sizes_are_stable() {
        assert_eq!(PRESERVE_ITEMS.len(), 18);
        assert_eq!(VARIANT_PREFIXES.len(), 16);
        assert_eq!(PROCESS_NAMES.len(), 26);
    }
}
