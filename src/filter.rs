//! Template filters: the marker strings that flag a file as a template and are
//! stripped from its name on output.

use indexmap::IndexSet;
use serde::Deserialize;

use crate::constants::DEFAULT_TEMPLATE_FILTER;

/// How a filter is matched against a file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMatch {
    /// The filter may appear anywhere in the name.
    #[default]
    Contains,
    /// The filter must end the name.
    Suffix,
}

/// Ordered set of template filters plus the policy used to match them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFilters {
    filters: IndexSet<String>,
    matching: FilterMatch,
}

impl Default for TemplateFilters {
    fn default() -> Self {
        Self::new([DEFAULT_TEMPLATE_FILTER])
    }
}

impl TemplateFilters {
    /// Builds a filter set, keeping the given order.
    ///
    /// Empty strings are dropped. If nothing is left the default filter is used.
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filters: IndexSet<String> =
            filters.into_iter().map(Into::into).filter(|f: &String| !f.is_empty()).collect();
        if filters.is_empty() {
            filters.insert(DEFAULT_TEMPLATE_FILTER.to_string());
        }
        Self { filters, matching: FilterMatch::default() }
    }

    pub fn with_match(mut self, matching: FilterMatch) -> Self {
        self.matching = matching;
        self
    }

    pub fn set_match(&mut self, matching: FilterMatch) {
        self.matching = matching;
    }

    pub fn matching(&self) -> FilterMatch {
        self.matching
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(String::as_str)
    }

    /// Returns true if `file_name` matches any filter.
    pub fn is_template(&self, file_name: &str) -> bool {
        self.iter().any(|filter| match self.matching {
            FilterMatch::Contains => file_name.contains(filter),
            FilterMatch::Suffix => file_name.ends_with(filter),
        })
    }

    /// Removes filter markers from `file_name`.
    ///
    /// Filters are applied in order against the result of the previous one, so
    /// a name carrying several markers loses all of them.
    pub fn strip(&self, file_name: &str) -> String {
        self.iter().fold(file_name.to_string(), |name, filter| match self.matching {
            FilterMatch::Contains => name.replace(filter, ""),
            FilterMatch::Suffix => match name.strip_suffix(filter) {
                Some(stripped) => stripped.to_string(),
                None => name,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filters = TemplateFilters::default();
        assert_eq!(filters.iter().collect::<Vec<_>>(), vec![".tmpl"]);
        assert_eq!(filters.matching(), FilterMatch::Contains);
    }

    #[test]
    fn test_empty_filters_fall_back_to_default() {
        let filters = TemplateFilters::new(Vec::<String>::new());
        assert_eq!(filters, TemplateFilters::default());

        let filters = TemplateFilters::new([""]);
        assert_eq!(filters, TemplateFilters::default());
    }

    #[test]
    fn test_contains_matches_anywhere() {
        let filters = TemplateFilters::default();
        assert!(filters.is_template("main.go.tmpl"));
        assert!(filters.is_template("main.tmpl.go"));
        assert!(!filters.is_template("main.go"));
    }

    #[test]
    fn test_suffix_matches_end_only() {
        let filters = TemplateFilters::default().with_match(FilterMatch::Suffix);
        assert!(filters.is_template("main.go.tmpl"));
        assert!(!filters.is_template("main.tmpl.go"));
    }

    #[test]
    fn test_strip_removes_every_marker() {
        let filters = TemplateFilters::new([".filtername", ".tmpl"]);
        assert_eq!(filters.strip("test.go.tmpl"), "test.go");
        assert_eq!(filters.strip("custom.filtername.txt"), "custom.txt");
        assert_eq!(filters.strip("both.tmpl.filtername"), "both");
        assert_eq!(filters.strip("a.tmpl.b.tmpl"), "a.b");
    }

    #[test]
    fn test_strip_suffix_in_filter_order() {
        let filters =
            TemplateFilters::new([".filtername", ".tmpl"]).with_match(FilterMatch::Suffix);
        assert_eq!(filters.strip("x.tmpl.filtername"), "x");
        assert_eq!(filters.strip("x.filtername.tmpl"), "x.filtername");
        assert_eq!(filters.strip("x.tmpl.go"), "x.tmpl.go");
    }
}
