use std::cmp::Ordering;
use std::fmt;

/// A plugin version key such as `1.10.0`.
///
/// Dotted integer versions compare component by component, so `1.10.0 > 1.9.0`
/// and `1.0 < 1.0.0`. Keys that are not dotted integers keep their text but
/// sort below every numeric version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId {
    raw: String,
    components: Option<Vec<u64>>,
}

impl VersionId {
    pub fn parse(raw: &str) -> Self {
        let components = raw
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>();
        Self {
            raw: raw.to_string(),
            components,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_numeric(&self) -> bool {
        self.components.is_some()
    }
}

impl Ord for VersionId {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_components = match (&self.components, &other.components) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        by_components.then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for VersionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Highest numeric version among `keys`, if any parses.
pub fn latest<'a, I>(keys: I) -> Option<VersionId>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(VersionId::parse)
        .filter(VersionId::is_numeric)
        .max()
}
