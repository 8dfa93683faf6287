//! Custom connection parameters.

use serde::{Deserialize, Serialize};

/// A single named connection parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameter {
    pub name: String,
    pub value: String,
}

/// Unique-keyed parameter list that keeps insertion order for rendering.
///
/// Equality compares values regardless of order.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionParameters {
    parameters: Vec<ConnectionParameter>,
}

impl ConnectionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a parameter, replacing the value of an existing one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.parameters.push(ConnectionParameter { name, value }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.parameters.iter().position(|p| p.name == name)?;
        Some(self.parameters.remove(index).value)
    }

    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    /// Copy without the parameters a connection string would drop.
    pub fn without_blank_values(&self) -> Self {
        Self {
            parameters: self
                .parameters
                .iter()
                .filter(|p| !p.value.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionParameter> {
        self.parameters.iter()
    }
}

impl PartialEq for ConnectionParameters {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .parameters
                .iter()
                .all(|p| other.get(&p.name) == Some(p.value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_value() {
        let mut params = ConnectionParameters::new();
        params.set("Encrypt", "true");
        params.set("Encrypt", "false");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("Encrypt"), Some("false"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut params = ConnectionParameters::new();
        params.set("Encrypt", "true");
        assert!(!params.contains("encrypt"));
    }

    #[test]
    fn equality_ignores_order() {
        let mut a = ConnectionParameters::new();
        a.set("A", "1");
        a.set("B", "2");
        let mut b = ConnectionParameters::new();
        b.set("B", "2");
        b.set("A", "1");
        assert_eq!(a, b);

        b.set("A", "3");
        assert_ne!(a, b);
    }

    #[test]
    fn blank_values_are_filtered() {
        let mut params = ConnectionParameters::new();
        params.set("A", "1");
        params.set("B", " ");
        let filtered = params.without_blank_values();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("A"), Some("1"));
    }

    #[test]
    fn remove_returns_value() {
        let mut params = ConnectionParameters::new();
        params.set("A", "1");
        assert_eq!(params.remove("A"), Some("1".to_string()));
        assert!(params.is_empty());
        assert_eq!(params.remove("A"), None);
    }

    #[test]
    fn iter_keeps_insertion_order() {
        let mut params = ConnectionParameters::new();
        params.set("Z", "1");
        params.set("A", "2");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
