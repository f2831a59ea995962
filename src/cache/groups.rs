//! Group Index Module
//!
//! Tags cache keys with named groups so a whole group can be invalidated at once.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

// == Group Policy ==
/// Decides what happens when a key that already belongs to a group is set
/// again under a different group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupPolicy {
    /// The first group a key was attributed to sticks until the key is removed.
    #[default]
    KeepFirst,
    /// A later set with a group moves the key into that group.
    Reassign,
}

impl FromStr for GroupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep-first" | "keep_first" | "keep" => Ok(Self::KeepFirst),
            "reassign" | "move" => Ok(Self::Reassign),
            other => Err(format!("unknown group policy '{}'", other)),
        }
    }
}

impl fmt::Display for GroupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepFirst => f.write_str("keep-first"),
            Self::Reassign => f.write_str("reassign"),
        }
    }
}

// == Group Index ==
/// Two-way index between groups and their member keys.
///
/// A key belongs to at most one group. Groups with no members are dropped.
#[derive(Debug, Default)]
pub struct GroupIndex {
    /// Group name -> member keys
    members: HashMap<String, BTreeSet<String>>,
    /// Key -> owning group
    by_key: HashMap<String, String>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Assign ==
    /// Attributes `key` to `group` under the given policy. Returns true when the
    /// key ends up a member of `group`.
    pub fn assign(&mut self, key: &str, group: &str, policy: GroupPolicy) -> bool {
        let current = self.by_key.get(key).cloned();
        match current {
            Some(existing) if existing == group => {}
            Some(existing) => match policy {
                GroupPolicy::KeepFirst => {
                    tracing::debug!(
                        key,
                        kept = %existing,
                        ignored = group,
                        "Key already grouped; keeping first group"
                    );
                }
                GroupPolicy::Reassign => {
                    self.detach(key, &existing);
                    self.attach(key, group);
                }
            },
            None => self.attach(key, group),
        }
        self.group_of(key) == Some(group)
    }

    // == Remove Key ==
    /// Drops a key's membership, returning the group it belonged to.
    pub fn remove_key(&mut self, key: &str) -> Option<String> {
        let group = self.by_key.remove(key)?;
        if let Some(keys) = self.members.get_mut(&group) {
            keys.remove(key);
            if keys.is_empty() {
                self.members.remove(&group);
            }
        }
        Some(group)
    }

    // == Take Group ==
    /// Removes a group and all its memberships, returning the member keys.
    pub fn take_group(&mut self, group: &str) -> Vec<String> {
        let keys = self.members.remove(group).unwrap_or_default();
        for key in &keys {
            self.by_key.remove(key);
        }
        keys.into_iter().collect()
    }

    /// Member keys of a group in sorted order.
    pub fn members(&self, group: &str) -> Vec<String> {
        self.members
            .get(group)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn group_of(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.by_key.clear();
    }

    fn attach(&mut self, key: &str, group: &str) {
        self.members
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string());
        self.by_key.insert(key.to_string(), group.to_string());
    }

    fn detach(&mut self, key: &str, group: &str) {
        if let Some(keys) = self.members.get_mut(group) {
            keys.remove(key);
            if keys.is_empty() {
                self.members.remove(group);
            }
        }
        self.by_key.remove(key);
    }
}
