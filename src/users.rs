//! User store: registration and login against a JSON file of
//! `username -> password` pairs.
//!
//! Passwords are stored and compared verbatim.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::db::{read_json, write_json};
use crate::error::Result;

#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl UserStore {
    /// Load users from `path`; a missing file gives an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let users = read_json::<BTreeMap<String, String>>(path)?.unwrap_or_default();
        info!("loaded {} user(s) from {}", users.len(), path.display());
        Ok(UserStore { path: path.to_path_buf(), users })
    }

    /// Insert or replace the password for `username`, then persist.
    pub fn register(&mut self, username: &str, password: &str) -> Result<()> {
        let mut next = self.users.clone();
        let replaced = next.insert(username.to_string(), password.to_string()).is_some();
        write_json(&self.path, &next)?;
        self.users = next;
        if replaced {
            info!("re-registered user '{username}'");
        } else {
            info!("registered user '{username}'");
        }
        Ok(())
    }

    /// True iff `username` exists and its password matches exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let ok = self.users.get(username).is_some_and(|p| p == password);
        debug!("authentication for '{username}': {}", if ok { "ok" } else { "rejected" });
        ok
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.users.len()
    }
}
