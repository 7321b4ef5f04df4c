//! OData-style filter expressions for the search index.
//!
//! Clauses are AND-joined; single quotes inside values are doubled.

const CONTENT_FIELD: &str = "content";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    clauses: Vec<String>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field eq 'value'`
    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(format!("{field} eq '{}'", escape(value)));
        self
    }

    /// Collection field contains any of `values`.
    pub fn any_of(mut self, field: &str, values: &[String]) -> Self {
        let parts: Vec<String> = values
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| format!("{field}/any(x: x eq '{}')", escape(v)))
            .collect();
        match parts.len() {
            0 => {}
            1 => self.clauses.extend(parts),
            _ => self.clauses.push(format!("({})", parts.join(" or "))),
        }
        self
    }

    /// Content must not match `term`.
    pub fn exclude_term(mut self, term: &str) -> Self {
        if !term.trim().is_empty() {
            self.clauses.push(format!(
                "not search.ismatch('{}', '{CONTENT_FIELD}')",
                escape(term.trim())
            ));
        }
        self
    }

    /// Content must match `term` as a phrase.
    pub fn include_term(mut self, term: &str) -> Self {
        if !term.trim().is_empty() {
            self.clauses.push(format!(
                "search.ismatch('\"{}\"', '{CONTENT_FIELD}')",
                escape(term.trim())
            ));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn build(&self) -> Option<String> {
        (!self.clauses.is_empty()).then(|| self.clauses.join(" and "))
    }
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses_are_and_joined() {
        let filter = FilterBuilder::new()
            .eq("repository", "acme/api")
            .eq("language", "python")
            .build();
        assert_eq!(
            filter.as_deref(),
            Some("repository eq 'acme/api' and language eq 'python'")
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let filter = FilterBuilder::new().eq("repository", "o'brien").build();
        assert_eq!(filter.as_deref(), Some("repository eq 'o''brien'"));
        let filter = FilterBuilder::new().exclude_term("don't").build();
        assert_eq!(
            filter.as_deref(),
            Some("not search.ismatch('don''t', 'content')")
        );
    }

    #[test]
    fn any_of_groups_alternatives() {
        let filter = FilterBuilder::new()
            .any_of("imports", &["requests".into(), "".into(), "redis".into()])
            .build();
        assert_eq!(
            filter.as_deref(),
            Some("(imports/any(x: x eq 'requests') or imports/any(x: x eq 'redis'))")
        );
    }

    #[test]
    fn empty_builder_has_no_filter() {
        assert!(FilterBuilder::new().exclude_term("  ").build().is_none());
    }
}
