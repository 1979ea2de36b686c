/// Include/exclude prefix rules for metric names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    /// If non-empty, a name must start with one of these
    pub include_prefixes: Vec<String>,

    /// A name starting with any of these is rejected, even if included
    pub exclude_prefixes: Vec<String>,
}

impl FilterPolicy {
    /// Builds a policy from comma separated prefix lists, e.g. "go_,process_".
    ///
    /// An empty string yields no rules; blank entries are skipped.
    pub fn from_config(include: &str, exclude: &str) -> Self {
        FilterPolicy {
            include_prefixes: split_prefixes(include),
            exclude_prefixes: split_prefixes(exclude),
        }
    }
}

fn split_prefixes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
}

/// Decides whether a series passes a `FilterPolicy`, by its unprefixed base name.
#[derive(Clone, Debug, Default)]
pub struct SeriesFilter {
    policy: FilterPolicy,
}

impl SeriesFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        SeriesFilter { policy }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    pub fn allows(&self, name: &str) -> bool {
        let include = &self.policy.include_prefixes;
        if !include.is_empty() && !include.iter().any(|p| name.starts_with(p.as_str())) {
            return false;
        }
        !self
            .policy
            .exclude_prefixes
            .iter()
            .any(|p| name.starts_with(p.as_str()))
    }
}

impl From<FilterPolicy> for SeriesFilter {
    fn from(policy: FilterPolicy) -> Self {
        SeriesFilter::new(policy)
    }
}
