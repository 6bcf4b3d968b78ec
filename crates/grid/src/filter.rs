//! Selection vocabulary for the dashboard views.
//!
//! The widgets speak in an "All" sentinel mixed with concrete values; the
//! core does not. These tagged unions are the only representation the view
//! builders accept — translation from widget values happens once, at the
//! interaction boundary.

use std::collections::BTreeSet;

/// Single-select state dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateFilter {
    All,
    Only(String),
}

impl StateFilter {
    /// Interpret a raw dropdown value.
    pub fn from_widget_value(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "All" {
            StateFilter::All
        } else {
            StateFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, state: &str) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(s) => s == state,
        }
    }
}

impl Default for StateFilter {
    fn default() -> Self {
        StateFilter::All
    }
}

/// Multi-select crime-type checklist.
///
/// An empty `Explicit` set means every type, same as `AllTypes`. The
/// checklist normalizes it away, but the variant is public and callers
/// may construct it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelection {
    AllTypes,
    Explicit(BTreeSet<String>),
}

impl TypeSelection {
    pub fn matches(&self, crime_type: &str) -> bool {
        match self {
            TypeSelection::AllTypes => true,
            TypeSelection::Explicit(set) => set.is_empty() || set.contains(crime_type),
        }
    }
}

impl Default for TypeSelection {
    fn default() -> Self {
        TypeSelection::AllTypes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_all_and_blank_map_to_all() {
        assert_eq!(StateFilter::from_widget_value("All"), StateFilter::All);
        assert_eq!(StateFilter::from_widget_value("  "), StateFilter::All);
        assert_eq!(
            StateFilter::from_widget_value("Johor"),
            StateFilter::Only("Johor".to_string())
        );
    }

    #[test]
    fn filters_match() {
        assert!(StateFilter::All.matches("Perak"));
        assert!(StateFilter::Only("Perak".to_string()).matches("Perak"));
        assert!(!StateFilter::Only("Perak".to_string()).matches("Johor"));

        let sel = TypeSelection::Explicit(BTreeSet::from(["Theft".to_string()]));
        assert!(sel.matches("Theft"));
        assert!(!sel.matches("Robbery"));
        assert!(TypeSelection::AllTypes.matches("Robbery"));
    }

    #[test]
    fn empty_explicit_set_matches_every_type() {
        let sel = TypeSelection::Explicit(BTreeSet::new());
        assert!(sel.matches("Theft"));
        assert!(sel.matches("Robbery"));
    }
}
