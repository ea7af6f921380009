//! User-registry access behind a narrow trait seam.
//!
//! The reset pipeline needs four registry operations: wholesale subtree
//! deletion, existence checks, child-key enumeration, and string-value
//! read/write for the autostart toggle. [`RegistryStore`] captures exactly
//! those; [`WinRegistry`] binds them to `HKEY_CURRENT_USER` on Windows and
//! [`MemoryRegistry`] provides an in-process stand-in used by tests and by
//! non-Windows builds, where there is no registry-backed trial state to
//! touch.
//!
//! Paths are backslash-separated and relative to the current-user hive,
//! e.g. `Software\JavaSoft`.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::Mutex;

/// Key/value hierarchy operations used by the reset pipeline.
pub trait RegistryStore {
    /// Delete a key and everything under it.
    ///
    /// Returns `Ok(true)` if the key existed and was deleted, `Ok(false)`
    /// if it was already absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the key exists but cannot be deleted (e.g.
    /// access denied).
    fn delete_subtree(&self, path: &str) -> io::Result<bool>;

    /// True if the key exists.
    fn subkey_exists(&self, path: &str) -> bool;

    /// Names of the immediate child keys, empty if the key is absent or
    /// cannot be enumerated.
    fn subkeys(&self, path: &str) -> Vec<String>;

    /// Read a string value, `None` if the key or value is absent.
    fn string_value(&self, path: &str, name: &str) -> Option<String>;

    /// Write a string value, creating the key if needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the key cannot be created or written.
    fn set_string_value(&self, path: &str, name: &str, value: &str) -> io::Result<()>;

    /// Delete a value. Returns `Ok(true)` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error when the value exists but cannot be deleted.
    fn delete_value(&self, path: &str, name: &str) -> io::Result<bool>;
}

impl<T: RegistryStore + ?Sized> RegistryStore for std::sync::Arc<T> {
    fn delete_subtree(&self, path: &str) -> io::Result<bool> {
        (**self).delete_subtree(path)
    }

    fn subkey_exists(&self, path: &str) -> bool {
        (**self).subkey_exists(path)
    }

    fn subkeys(&self, path: &str) -> Vec<String> {
        (**self).subkeys(path)
    }

    fn string_value(&self, path: &str, name: &str) -> Option<String> {
        (**self).string_value(path, name)
    }

    fn set_string_value(&self, path: &str, name: &str, value: &str) -> io::Result<()> {
        (**self).set_string_value(path, name, value)
    }

    fn delete_value(&self, path: &str, name: &str) -> io::Result<bool> {
        (**self).delete_value(path, name)
    }
}

/// The platform registry store: live `HKCU` on Windows, an empty in-memory
/// store elsewhere so registry steps become no-ops.
#[must_use]
pub fn default_registry() -> Box<dyn RegistryStore> {
    #[cfg(windows)]
    {
        Box::new(WinRegistry)
    }
    #[cfg(not(windows))]
    {
        Box::new(MemoryRegistry::new())
    }
}

#[cfg(windows)]
pub use win::WinRegistry;

#[cfg(windows)]
mod win {
    use std::io;

    use winreg::enums::{HKEY_CURRENT_USER, KEY_SET_VALUE};
    use winreg::RegKey;

    use super::RegistryStore;

    /// [`RegistryStore`] backed by the live registry, rooted at
    /// `HKEY_CURRENT_USER`.
    #[derive(Debug, Default)]
    pub struct WinRegistry;

    impl WinRegistry {
        fn hkcu() -> RegKey {
            RegKey::predef(HKEY_CURRENT_USER)
        }
    }

    impl RegistryStore for WinRegistry {
        fn delete_subtree(&self, path: &str) -> io::Result<bool> {
            let hkcu = Self::hkcu();
            match hkcu.open_subkey(path) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
                Err(e) => return Err(e),
                Ok(_) => {}
            }
            hkcu.delete_subkey_all(path)?;
            Ok(true)
        }

        fn subkey_exists(&self, path: &str) -> bool {
            Self::hkcu().open_subkey(path).is_ok()
        }

        fn subkeys(&self, path: &str) -> Vec<String> {
            match Self::hkcu().open_subkey(path) {
                Ok(key) => key.enum_keys().filter_map(Result::ok).collect(),
                Err(_) => Vec::new(),
            }
        }

        fn string_value(&self, path: &str, name: &str) -> Option<String> {
            Self::hkcu().open_subkey(path).ok()?.get_value(name).ok()
        }

        fn set_string_value(&self, path: &str, name: &str, value: &str) -> io::Result<()> {
            let (key, _) = Self::hkcu().create_subkey(path)?;
            key.set_value(name, &value)
        }

        fn delete_value(&self, path: &str, name: &str) -> io::Result<bool> {
            let key = match Self::hkcu().open_subkey_with_flags(path, KEY_SET_VALUE) {
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
                Err(e) => return Err(e),
                Ok(key) => key,
            };
            match key.delete_value(name) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e),
            }
        }
    }
}

/// In-memory [`RegistryStore`].
///
/// Paths compare exactly (no case folding); callers in this crate use
/// consistent casing throughout.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    keys: BTreeSet<String>,
    values: BTreeMap<(String, String), String>,
}

impl MemoryRegistry {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key path. Ancestors exist implicitly.
    pub fn add_key(&self, path: &str) {
        self.inner.lock().unwrap().keys.insert(path.to_string());
    }
}

fn is_under(candidate: &str, path: &str) -> bool {
    candidate == path
        || (candidate.len() > path.len()
            && candidate.starts_with(path)
            && candidate.as_bytes()[path.len()] == b'\\')
}

impl RegistryStore for MemoryRegistry {
    fn delete_subtree(&self, path: &str) -> io::Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.keys.iter().any(|k| is_under(k, path))
            || inner.values.keys().any(|(k, _)| is_under(k, path));
        inner.keys.retain(|k| !is_under(k, path));
        inner.values.retain(|(k, _), _| !is_under(k, path));
        Ok(existed)
    }

    fn subkey_exists(&self, path: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.keys.iter().any(|k| is_under(k, path))
            || inner.values.keys().any(|(k, _)| is_under(k, path))
    }

    fn subkeys(&self, path: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let prefix = format!("{path}\\");
        let mut children = BTreeSet::new();
        for key in inner
            .keys
            .iter()
            .chain(inner.values.keys().map(|(k, _)| k))
        {
            if let Some(rest) = key.strip_prefix(&prefix) {
                let child = rest.split('\\').next().unwrap_or(rest);
                if !child.is_empty() {
                    children.insert(child.to_string());
                }
            }
        }
        children.into_iter().collect()
    }

    fn string_value(&self, path: &str, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .values
            .get(&(path.to_string(), name.to_string()))
            .cloned()
    }

    fn set_string_value(&self, path: &str, name: &str, value: &str) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.keys.insert(path.to_string());
        inner
            .values
            .insert((path.to_string(), name.to_string()), value.to_string());
        Ok(())
    }

    fn delete_value(&self, path: &str, name: &str) -> io::Result<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values
            .remove(&(path.to_string(), name.to_string()))
            .is_some())
    }
}
