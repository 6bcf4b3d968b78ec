use std::collections::BTreeSet;

use grid::TypeSelection;

/// Widget sentinel for "every crime type".
pub const ALL_SENTINEL: &str = "All";

/// Normalize a raw checklist selection.
///
/// - empty selection resets to every type;
/// - "All" mixed with explicit entries drops "All" (specific wins);
/// - "All" alone means every type;
/// - anything else is taken as-is.
pub fn normalize_types(raw: &[String]) -> TypeSelection {
    if raw.is_empty() {
        return TypeSelection::AllTypes;
    }

    let has_all = raw.iter().any(|v| v == ALL_SENTINEL);
    if has_all && raw.len() == 1 {
        return TypeSelection::AllTypes;
    }

    let explicit: BTreeSet<String> = raw
        .iter()
        .filter(|v| v.as_str() != ALL_SENTINEL)
        .cloned()
        .collect();

    if explicit.is_empty() {
        // e.g. ["All", "All"]
        TypeSelection::AllTypes
    } else {
        TypeSelection::Explicit(explicit)
    }
}

/// Widget values a checklist should be rewritten with after
/// normalization.
pub fn as_widget_values(selection: &TypeSelection) -> Vec<String> {
    match selection {
        TypeSelection::AllTypes => vec![ALL_SENTINEL.to_string()],
        TypeSelection::Explicit(set) => set.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_resets_to_all() {
        assert_eq!(normalize_types(&[]), TypeSelection::AllTypes);
        assert_eq!(as_widget_values(&normalize_types(&[])), ["All"]);
    }

    #[test]
    fn all_plus_specific_drops_all() {
        let sel = normalize_types(&raw(&["All", "Theft"]));
        assert_eq!(
            sel,
            TypeSelection::Explicit(BTreeSet::from(["Theft".to_string()]))
        );
        assert_eq!(as_widget_values(&sel), ["Theft"]);
    }

    #[test]
    fn explicit_selection_is_kept() {
        let sel = normalize_types(&raw(&["Theft", "Assault"]));
        assert_eq!(
            sel,
            TypeSelection::Explicit(BTreeSet::from([
                "Theft".to_string(),
                "Assault".to_string()
            ]))
        );
        assert_eq!(as_widget_values(&sel), ["Assault", "Theft"]);
    }

    #[test]
    fn all_alone_stays_all() {
        assert_eq!(normalize_types(&raw(&["All"])), TypeSelection::AllTypes);
        assert_eq!(
            normalize_types(&raw(&["All", "All"])),
            TypeSelection::AllTypes
        );
    }
}
