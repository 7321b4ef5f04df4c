//! Per-intent boost terms appended to the query and terms excluded from results.

use sift_core::Intent;

pub struct IntentTerms {
    pub boost: &'static [&'static str],
    pub exclude: &'static [&'static str],
}

pub fn terms_for(intent: Intent) -> IntentTerms {
    match intent {
        Intent::Implement => IntentTerms {
            boost: &["implementation", "example"],
            exclude: &["test", "mock"],
        },
        Intent::Debug => IntentTerms {
            boost: &["error", "handling"],
            exclude: &[],
        },
        Intent::Understand => IntentTerms {
            boost: &["overview", "documentation"],
            exclude: &["test"],
        },
        Intent::Refactor => IntentTerms {
            boost: &["pattern", "structure"],
            exclude: &[],
        },
        Intent::Test => IntentTerms {
            boost: &["test", "assert"],
            exclude: &[],
        },
        Intent::Document => IntentTerms {
            boost: &["docstring", "usage"],
            exclude: &["test"],
        },
    }
}
