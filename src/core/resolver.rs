use std::collections::HashMap;

/// Hash-indexed call resolver with a first-match policy.
///
/// A callee hint resolves to the first registered symbol whose id equals the
/// hint's last dotted component or ends with `.` followed by it. Candidates
/// with the same last component are never disambiguated by scope or type;
/// registration order alone decides.
#[derive(Debug, Clone, Default)]
pub struct CallResolver {
    by_last_segment: HashMap<String, String>,
}

impl CallResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes candidate ids. Must be called with ids in registration order.
    pub fn build_index<'a>(&mut self, node_ids: impl IntoIterator<Item = &'a str>) {
        self.by_last_segment.clear();
        for id in node_ids {
            self.by_last_segment
                .entry(last_segment(id).to_string())
                .or_insert_with(|| id.to_string());
        }
    }

    pub fn resolve(&self, hint: &str) -> Option<&str> {
        self.by_last_segment
            .get(last_segment(hint))
            .map(String::as_str)
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(ids: &[&str]) -> CallResolver {
        let mut resolver = CallResolver::new();
        resolver.build_index(ids.iter().copied());
        resolver
    }

    #[test]
    fn first_registered_candidate_wins() {
        let resolver = resolver(&["a.helper", "b.helper", "c.Service.helper"]);
        assert_eq!(resolver.resolve("helper"), Some("a.helper"));
        assert_eq!(resolver.resolve("obj.helper"), Some("a.helper"));
    }

    #[test]
    fn bare_module_id_matches_exactly() {
        let resolver = resolver(&["utils", "pkg.utils"]);
        assert_eq!(resolver.resolve("utils"), Some("utils"));
    }

    #[test]
    fn suffix_must_align_with_a_dot() {
        let resolver = resolver(&["m.do_something"]);
        assert_eq!(resolver.resolve("something"), None);
        assert_eq!(resolver.resolve("self.do_something"), Some("m.do_something"));
    }
}
