use std::fmt;

/// Stable cache key: a resource name followed by its parameters.
///
/// Keys compare part by part, so `myGroupRoutines` is a prefix of
/// `myGroupRoutines:0:10`. Invalidation uses that prefix relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        QueryKey(vec![resource.to_owned()])
    }

    pub fn with(mut self, part: impl fmt::Display) -> Self {
        self.0.push(part.to_string());
        self
    }

    /// Appends `part` only when present, keeping `None` and absent params equal.
    pub fn with_opt<T: fmt::Display>(self, name: &str, part: Option<T>) -> Self {
        match part {
            Some(part) => self.with(format!("{}={}", name, part)),
            None => self,
        }
    }

    pub fn resource(&self) -> &str {
        &self.0[0]
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}
