//! Cross-level queries: lookup with user-over-global precedence, conflict
//! detection, and keyword-filtered views over both alias sets.

use std::collections::HashSet;

use crate::cfg::alias::{Alias, Level};
use crate::cfg::store::AliasSet;

/// Resolve `name`, preferring the user level over the global one
pub fn lookup<'a>(name: &str, user: &'a AliasSet, global: &'a AliasSet) -> Option<(&'a Alias, Level)> {
    user.find(name)
        .map(|alias| (alias, Level::User))
        .or_else(|| global.find(name).map(|alias| (alias, Level::Global)))
}

/// Names defined at both levels, in global-set order
pub fn find_conflicts(user: &AliasSet, global: &AliasSet) -> Vec<String> {
    let user_names: HashSet<&str> = user.iter().map(|a| a.name.as_str()).collect();
    global
        .iter()
        .filter(|a| user_names.contains(a.name.as_str()))
        .map(|a| a.name.clone())
        .collect()
}

/// Both levels filtered by an optional keyword; no precedence is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<'a> {
    pub keyword: Option<String>,
    pub global: Vec<&'a Alias>,
    pub user: Vec<&'a Alias>,
}

impl Listing<'_> {
    #[must_use]
    pub fn global_count(&self) -> usize {
        self.global.len()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.user.len()
    }

    /// Combined count, only reported when a keyword was given
    #[must_use]
    pub fn total_found(&self) -> Option<usize> {
        self.keyword.as_ref().map(|_| self.global.len() + self.user.len())
    }
}

pub fn list<'a>(user: &'a AliasSet, global: &'a AliasSet, keyword: &str) -> Listing<'a> {
    Listing {
        keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
        global: global.filter(keyword),
        user: user.filter(keyword),
    }
}

/// Result of a keyword search across both levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport<'a> {
    pub keyword: String,
    pub global: Vec<&'a Alias>,
    pub user: Vec<&'a Alias>,
}

impl SearchReport<'_> {
    #[must_use]
    pub fn total(&self) -> usize {
        self.global.len() + self.user.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub fn search<'a>(user: &'a AliasSet, global: &'a AliasSet, keyword: &str) -> SearchReport<'a> {
    SearchReport {
        keyword: keyword.to_string(),
        global: global.filter(keyword),
        user: user.filter(keyword),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(level: Level, entries: &[(&str, &str)]) -> AliasSet {
        entries.iter().map(|(n, c)| Alias::new(n, c, level)).collect()
    }

    #[test]
    fn test_lookup_disjoint_names() {
        let user = set(Level::User, &[("u1", "echo user")]);
        let global = set(Level::Global, &[("g1", "echo global")]);

        assert_eq!(lookup("u1", &user, &global).map(|(_, l)| l), Some(Level::User));
        assert_eq!(lookup("g1", &user, &global).map(|(_, l)| l), Some(Level::Global));
        assert_eq!(lookup("none", &user, &global), None);
    }

    #[test]
    fn test_user_shadows_global() {
        let mut user = AliasSet::new();
        let global = set(Level::Global, &[("deploy", "kubectl apply -f .")]);

        let (alias, level) = lookup("deploy", &user, &global).unwrap();
        assert_eq!(level, Level::Global);
        assert_eq!(alias.command, "kubectl apply -f .");
        assert!(find_conflicts(&user, &global).is_empty());

        user.upsert(Alias::new("deploy", "echo hi", Level::User));

        let (alias, level) = lookup("deploy", &user, &global).unwrap();
        assert_eq!(level, Level::User);
        assert_eq!(alias.command, "echo hi");
        assert_eq!(find_conflicts(&user, &global), vec!["deploy".to_string()]);
    }

    #[test]
    fn test_conflicts_follow_global_order() {
        let user = set(Level::User, &[("c", "1"), ("a", "1"), ("x", "1")]);
        let global = set(Level::Global, &[("a", "2"), ("b", "2"), ("c", "2")]);
        assert_eq!(find_conflicts(&user, &global), vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_list_without_keyword_shows_everything() {
        let user = set(Level::User, &[("a", "cmd1")]);
        let global = set(Level::Global, &[("b", "cmd2")]);

        let listing = list(&user, &global, "");
        assert_eq!(listing.global_count(), 1);
        assert_eq!(listing.user_count(), 1);
        assert_eq!(listing.total_found(), None);
    }

    #[test]
    fn test_list_with_keyword_reports_total() {
        let user = set(Level::User, &[("gs", "git status"), ("ll", "ls -la")]);
        let global = set(Level::Global, &[("gp", "git push"), ("k", "kubectl")]);

        let listing = list(&user, &global, "git");
        assert_eq!(listing.global.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), vec!["gp"]);
        assert_eq!(listing.user.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), vec!["gs"]);
        assert_eq!(listing.total_found(), Some(2));
    }

    #[test]
    fn test_list_shows_both_sides_of_a_conflict() {
        let user = set(Level::User, &[("deploy", "echo hi")]);
        let global = set(Level::Global, &[("deploy", "kubectl apply -f .")]);

        let listing = list(&user, &global, "deploy");
        assert_eq!(listing.global[0].command, "kubectl apply -f .");
        assert_eq!(listing.user[0].command, "echo hi");
    }

    #[test]
    fn test_search_empty_and_found() {
        let user = set(Level::User, &[("gs", "git status")]);
        let global = set(Level::Global, &[("dc", "docker compose")]);

        let report = search(&user, &global, "helm");
        assert!(report.is_empty());

        let report = search(&user, &global, "o");
        assert_eq!(report.total(), 1);
        assert_eq!(report.global[0].name, "dc");

        let report = search(&user, &global, "s");
        assert_eq!(report.total(), 2);
    }
}
