//! Structural query variants: clause reordering and question-form toggling.

const CONNECTORS: &[&str] = &["with", "for", "using", "in", "and", "from"];
const QUESTION_LEADS: &[&str] = &[
    "how do i ",
    "how can i ",
    "how should i ",
    "how to ",
    "what is ",
    "where is ",
    "why does ",
];

/// Swap the clauses around the first connector word:
/// "implement caching with retry logic" → "retry logic implement caching".
pub fn reorder(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let pos = words
        .iter()
        .position(|w| CONNECTORS.iter().any(|c| c.eq_ignore_ascii_case(w)))?;
    if pos == 0 || pos + 1 >= words.len() {
        return None;
    }
    let left = words[..pos].join(" ");
    let right = words[pos + 1..].join(" ");
    Some(format!("{right} {left}"))
}

/// Questions become statements and statements become "how to" questions.
pub fn toggle_question(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for lead in QUESTION_LEADS {
        let matches_lead = trimmed
            .get(..lead.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(lead));
        if matches_lead {
            let rest = trimmed[lead.len()..].trim().trim_end_matches('?').trim();
            return (!rest.is_empty()).then(|| rest.to_string());
        }
    }
    if trimmed.ends_with('?') {
        let rest = trimmed.trim_end_matches('?').trim();
        return (!rest.is_empty()).then(|| rest.to_string());
    }
    Some(format!("how to {trimmed}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorder_around_connector() {
        assert_eq!(
            reorder("implement caching with retry logic").as_deref(),
            Some("retry logic implement caching")
        );
        assert_eq!(reorder("caching"), None);
        assert_eq!(reorder("with retry"), None);
    }

    #[test]
    fn toggle_question_both_ways() {
        assert_eq!(
            toggle_question("How do I parse TOML?").as_deref(),
            Some("parse TOML")
        );
        assert_eq!(
            toggle_question("parse toml").as_deref(),
            Some("how to parse toml")
        );
    }
}
