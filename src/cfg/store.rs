use serde::{Deserialize, Serialize};

use super::alias::Alias;

/// Ordered aliases for one level; names are unique within the set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasSet {
    aliases: Vec<Alias>,
}

impl AliasSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { aliases: Vec::new() }
    }

    /// First record whose name equals `name` exactly
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Alias> {
        self.aliases.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Remove the first record named `name`, returning it; absence leaves the set untouched
    pub fn remove(&mut self, name: &str) -> Option<Alias> {
        let index = self.aliases.iter().position(|a| a.name == name)?;
        Some(self.aliases.remove(index))
    }

    /// Replace any record with the same name, appending the new one at the end
    pub fn upsert(&mut self, alias: Alias) -> Option<Alias> {
        let previous = self.remove(&alias.name);
        self.aliases.push(alias);
        previous
    }

    pub fn clear(&mut self) {
        self.aliases.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Alias> {
        self.aliases.iter()
    }

    /// Records matching `keyword` on name or command, in set order
    #[must_use]
    pub fn filter(&self, keyword: &str) -> Vec<&Alias> {
        self.aliases.iter().filter(|a| a.matches(keyword)).collect()
    }
}

// Duplicate names keep only the last occurrence, at its position of last write.
impl FromIterator<Alias> for AliasSet {
    fn from_iter<I: IntoIterator<Item = Alias>>(iter: I) -> Self {
        let mut set = AliasSet::new();
        for alias in iter {
            set.upsert(alias);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AliasSet {
    type Item = &'a Alias;
    type IntoIter = std::slice::Iter<'a, Alias>;

    fn into_iter(self) -> Self::IntoIter {
        self.aliases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::alias::Level;
    use pretty_assertions::assert_eq;

    fn alias(name: &str, command: &str) -> Alias {
        Alias {
            name: name.to_string(),
            command: command.to_string(),
            created: "2024-01-01 00:00:00".to_string(),
            level: Level::User,
        }
    }

    fn names(set: &AliasSet) -> Vec<&str> {
        set.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_find_returns_exact_match() {
        let set: AliasSet = vec![alias("g", "git"), alias("gs", "git status")].into_iter().collect();
        assert_eq!(set.find("gs").map(|a| a.command.as_str()), Some("git status"));
        assert_eq!(set.find("G"), None);
        assert_eq!(set.find("gst"), None);
    }

    #[test]
    fn test_upsert_new_name_appends() {
        let mut set = AliasSet::new();
        assert_eq!(set.upsert(alias("a", "1")), None);
        assert_eq!(set.upsert(alias("b", "2")), None);
        assert_eq!(set.len(), 2);
        assert_eq!(names(&set), vec!["a", "b"]);
    }

    #[test]
    fn test_upsert_existing_name_moves_to_end_without_duplicating() {
        let mut set: AliasSet = vec![alias("a", "1"), alias("b", "2"), alias("c", "3")].into_iter().collect();
        let previous = set.upsert(alias("a", "updated"));
        assert_eq!(previous.map(|a| a.command), Some("1".to_string()));
        assert_eq!(set.len(), 3);
        assert_eq!(names(&set), vec!["b", "c", "a"]);
        assert_eq!(set.find("a").map(|a| a.command.as_str()), Some("updated"));
    }

    #[test]
    fn test_remove_missing_name_is_noop() {
        let mut set: AliasSet = vec![alias("a", "1"), alias("b", "2")].into_iter().collect();
        let before = set.clone();
        assert_eq!(set.remove("zzz"), None);
        assert_eq!(set, before);
    }

    #[test]
    fn test_remove_existing_name() {
        let mut set: AliasSet = vec![alias("a", "1"), alias("b", "2"), alias("c", "3")].into_iter().collect();
        let removed = set.remove("b");
        assert_eq!(removed.map(|a| a.name), Some("b".to_string()));
        assert_eq!(names(&set), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_matches_name_or_command() {
        let set: AliasSet = vec![alias("gs", "git status"), alias("ll", "ls -la"), alias("k", "kubectl")]
            .into_iter()
            .collect();
        let hits: Vec<_> = set.filter("s").iter().map(|a| a.name.as_str()).collect();
        assert_eq!(hits, vec!["gs", "ll"]);
        assert_eq!(set.filter("").len(), 3);
    }

    #[test]
    fn test_serializes_as_plain_array() -> Result<(), eyre::Error> {
        let set = AliasSet::new();
        assert_eq!(serde_json::to_string_pretty(&set)?, "[]");
        let parsed: AliasSet = serde_json::from_str(r#"[{"name":"x","command":"y"}]"#)?;
        assert_eq!(parsed.len(), 1);
        Ok(())
    }
}
