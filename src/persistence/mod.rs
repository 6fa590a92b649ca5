//! Roster persistence
//!
//! The roster is stored as a comma-joined list of names, both in LocalStorage
//! and in the page URL (`?lista=`), so a link to the page carries the list.
//! Ids are not persisted; every load mints fresh ones.
//!
//! A name containing a comma splits into two entrants on the next load.

use crate::entrant::{Entrant, Roster};

/// LocalStorage key for the saved roster
pub const STORAGE_KEY: &str = "rode_roleta_v1";
/// Query parameter carrying the roster in shared links
pub const URL_PARAM: &str = "lista";

/// Join entrant names with commas
pub fn encode_names(entrants: &[Entrant]) -> String {
    entrants
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a comma-joined list into `roster`, returning how many were added.
/// Pieces are trimmed and blanks dropped.
pub fn decode_names(raw: &str, roster: &mut Roster) -> usize {
    raw.split(',').filter(|piece| roster.add(piece).is_some()).count()
}

/// Percent-encode like JavaScript's `encodeURIComponent`
pub fn encode_uri_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// Shareable link for `entrants` on the page at `origin` + `path`
pub fn share_url(origin: &str, path: &str, entrants: &[Entrant]) -> String {
    format!(
        "{}{}?{}={}",
        origin,
        path,
        URL_PARAM,
        encode_uri_component(&encode_names(entrants))
    )
}

/// Browser-backed roster storage (LocalStorage + URL)
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterStore;

#[cfg(target_arch = "wasm32")]
impl RosterStore {
    /// Load into `roster`, preferring the URL over LocalStorage.
    /// Returns the number of entrants added.
    pub fn load(&self, roster: &mut Roster) -> usize {
        let Some(window) = web_sys::window() else {
            return 0;
        };

        let from_url = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get(URL_PARAM))
            .filter(|names| !names.is_empty());
        if let Some(names) = from_url {
            let added = decode_names(&names, roster);
            log::info!("Loaded {} entrants from URL", added);
            return added;
        }

        let storage = window.local_storage().ok().flatten();
        if let Some(storage) = storage {
            if let Ok(Some(names)) = storage.get_item(STORAGE_KEY) {
                if !names.is_empty() {
                    let added = decode_names(&names, roster);
                    log::info!("Loaded {} entrants from LocalStorage", added);
                    return added;
                }
            }
        }

        log::info!("No saved roster, starting empty");
        0
    }

    /// Write the roster to LocalStorage and mirror it into the URL
    pub fn save(&self, entrants: &[Entrant]) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let names = encode_names(entrants);

        let storage = window.local_storage().ok().flatten();
        if let Some(storage) = storage {
            if let Err(e) = storage.set_item(STORAGE_KEY, &names) {
                log::warn!("Could not save roster: {:?}", e);
            }
        }

        let location = window.location();
        // history.replaceState is unavailable for blob: documents
        if location.protocol().map(|p| p == "blob:").unwrap_or(true) {
            return;
        }
        let Ok(href) = location.href() else {
            return;
        };

        match web_sys::Url::new(&href) {
            Ok(url) => {
                let params = url.search_params();
                if entrants.is_empty() {
                    params.delete(URL_PARAM);
                } else {
                    params.set(URL_PARAM, &names);
                }
                let replaced = window.history().and_then(|history| {
                    history.replace_state_with_url(
                        &wasm_bindgen::JsValue::NULL,
                        "",
                        Some(&url.href()),
                    )
                });
                if let Err(e) = replaced {
                    log::warn!("Could not update URL: {:?}", e);
                }
            }
            Err(e) => log::warn!("Could not parse page URL: {:?}", e),
        }
    }

    /// Shareable link for the current page
    pub fn share_url(&self, entrants: &[Entrant]) -> Option<String> {
        let location = web_sys::window()?.location();
        let origin = location.origin().ok()?;
        let path = location.pathname().ok()?;
        Some(share_url(&origin, &path, entrants))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RosterStore {
    /// Native stub: nothing is stored outside the browser
    pub fn load(&self, _roster: &mut Roster) -> usize {
        0
    }

    pub fn save(&self, _entrants: &[Entrant]) {
        // No-op for native
    }

    pub fn share_url(&self, _entrants: &[Entrant]) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        let mut roster = Roster::new(1);
        for name in names {
            roster.add(name);
        }
        roster
    }

    #[test]
    fn test_encode_joins_names() {
        assert_eq!(encode_names(roster(&["Ana", "Bruno", "Carla"]).entrants()), "Ana,Bruno,Carla");
        assert_eq!(encode_names(&[]), "");
    }

    #[test]
    fn test_decode_trims_and_drops_blanks() {
        let mut roster = Roster::new(7);
        let added = decode_names(" Ana , ,Bruno,,  Carla  ,", &mut roster);
        assert_eq!(added, 3);
        assert_eq!(roster.names().collect::<Vec<_>>(), vec!["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn test_decode_mints_fresh_ids() {
        let mut roster = Roster::new(7);
        decode_names("Ana,Ana", &mut roster);
        let ids: Vec<_> = roster.entrants().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_decode_empty_adds_nothing() {
        let mut roster = Roster::new(7);
        assert_eq!(decode_names("", &mut roster), 0);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_names_survive_storage() {
        let original = roster(&["Ana", "José Maria", "Zoë"]);
        let mut loaded = Roster::new(99);
        decode_names(&encode_names(original.entrants()), &mut loaded);
        assert_eq!(loaded.names().collect::<Vec<_>>(), original.names().collect::<Vec<_>>());
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("Ana,Bruno"), "Ana%2CBruno");
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("João"), "Jo%C3%A3o");
        assert_eq!(encode_uri_component("it's(ok)!*~-_."), "it's(ok)!*~-_.");
    }

    #[test]
    fn test_share_url() {
        let url = share_url(
            "https://example.org",
            "/roleta/",
            roster(&["Ana", "Bruno"]).entrants(),
        );
        assert_eq!(url, "https://example.org/roleta/?lista=Ana%2CBruno");
    }
}
