/// A single wildcard rule. `*` is only special at either end of the rule.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Rule {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

impl Rule {
    fn parse(raw: &str) -> Self {
        match (raw.strip_prefix('*'), raw.strip_suffix('*')) {
            (Some(rest), Some(_)) => Rule::Contains(rest.strip_suffix('*').unwrap_or(rest).into()),
            (Some(rest), None) => Rule::Suffix(rest.into()),
            (None, Some(rest)) => Rule::Prefix(rest.into()),
            (None, None) => Rule::Exact(raw.into()),
        }
    }

    fn matches(&self, item: &str) -> bool {
        match self {
            Rule::Exact(s) => item == s,
            Rule::Prefix(s) => item.starts_with(s.as_str()),
            Rule::Suffix(s) => item.ends_with(s.as_str()),
            Rule::Contains(s) => item.contains(s.as_str()),
        }
    }
}

/// A comma-separated list of wildcard rules naming things to leave out.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OmitRules {
    rules: Vec<Rule>,
}

impl OmitRules {
    pub fn parse(list: &str) -> Self {
        let rules = list
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(Rule::parse)
            .collect();

        Self { rules }
    }

    /// True if any rule matches `item`.
    pub fn omits(&self, item: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(item))
    }
}
