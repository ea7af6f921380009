//! Trial-marker scrubbing for restored preference files.
//!
//! A restored variant's `options/other.xml` carries a `PropertyService`
//! component whose CDATA body is a JSON document; its `keyToString` map is
//! where the IDE keeps trial bookkeeping alongside ordinary properties.
//! This module strips the trial keys out of that map and leaves everything
//! else byte-for-byte intact.
//!
//! The file is treated as two layers: an outer textual envelope located by
//! pattern (never a structural XML parse) and an inner JSON document parsed
//! on its own. Substitution is confined to exactly the matched envelope
//! span. A document that does not parse is left untouched; scrubbing never
//! propagates an error to its caller, so the worst case is that trial
//! markers survive in one file.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::{Regex, RegexSet};
use serde_json::Value;

/// Preferences file inside a variant's `options` directory.
const PREFERENCES_FILE: &str = "other.xml";

fn envelope_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<component name="PropertyService"><!\[CDATA\[(.*?)\]\]></component>"#)
            .expect("envelope pattern is valid")
    })
}

fn marker_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new([
            r"(?i)^evl",
            r"(?i)^trial\.",
            r"(?i)evalsprt",
            r"(?i)\.runnable$",
        ])
        .expect("marker patterns are valid")
    })
}

/// True if a property key is trial bookkeeping rather than a user setting.
#[must_use]
pub fn is_trial_marker(key: &str) -> bool {
    marker_set().is_match(key)
}

/// Scrub trial markers from the preferences file under `options_dir`.
///
/// No-op if the file is absent. Errors are logged and swallowed.
pub fn scrub_options_dir(options_dir: &Path) {
    let path = options_dir.join(PREFERENCES_FILE);
    if !path.is_file() {
        return;
    }
    if let Err(e) = scrub_file(&path) {
        log::warn!("could not scrub {}: {e:#}", path.display());
    }
}

fn scrub_file(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;

    let Some(caps) = envelope_re().captures(&content) else {
        log::debug!("{}: no PropertyService envelope", path.display());
        return Ok(());
    };
    let envelope = caps.get(0).expect("whole match");
    let body = caps.get(1).expect("CDATA group");

    // An unparseable body must leave the file untouched.
    let Ok(mut doc) = serde_json::from_str::<Value>(body.as_str()) else {
        log::debug!("{}: embedded document does not parse, leaving as is", path.display());
        return Ok(());
    };

    let mut removed = 0;
    if let Some(map) = doc.get_mut("keyToString").and_then(Value::as_object_mut) {
        let before = map.len();
        // retain keeps the surviving keys in their original order.
        map.retain(|key, _| !is_trial_marker(key));
        removed = before - map.len();
    }
    log::debug!("{}: removed {removed} trial key(s)", path.display());

    let replacement = format!(
        "<component name=\"PropertyService\"><![CDATA[{}]]></component>",
        serde_json::to_string_pretty(&doc)?
    );

    let mut rewritten =
        String::with_capacity(content.len() - envelope.len() + replacement.len());
    rewritten.push_str(&content[..envelope.start()]);
    rewritten.push_str(&replacement);
    rewritten.push_str(&content[envelope.end()..]);

    fs::write(path, rewritten)?;
    Ok(())
}
