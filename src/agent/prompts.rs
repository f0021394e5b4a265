//! Prompt templates for every pipeline step.
//!
//! Each builder renders one fixed instruction around the user's query, an
//! interpretation, or a candidate code body. No state, no I/O.

/// Appended to ambiguous-path feedback when it is returned as `code`.
pub const MORE_DETAIL_SUFFIX: &str =
    "\n\nPlease provide more details so I can generate the appropriate code for you.";

/// Phrases in an interpretation that send a complex query back to the
/// ambiguous handler. Matched case-insensitively as substrings.
pub const HEDGE_PHRASES: [&str; 3] = ["unclear", "ambiguous", "need more information"];

/// Three-way rubric for the classifier model.
pub fn classify_query(query: &str) -> String {
    format!(
        "\
Analyze this coding request and classify it as \"simple\", \"complex\", or \"ambiguous\".
- Simple: Basic requests like \"Write a Python function to reverse a string.\"
- Complex: Requests involving customization, optimization, or multiple features.
- Ambiguous: Unclear requests lacking specifics.
Respond with ONLY the word \"simple\", \"complex\", or \"ambiguous\".
Query: \"{query}\""
    )
}

/// Ask the interpreter what is missing from an ambiguous request.
pub fn ambiguous_feedback(query: &str) -> String {
    format!(
        "\
You are a coding assistant. This query is ambiguous or lacks specifics: \"{query}\".
Please provide helpful feedback on what details are needed to generate the code.
Be specific about what information is missing (e.g., programming language, input/output format, etc.)."
    )
}

/// Single-shot generation for simple requests.
pub fn generate_code(query: &str) -> String {
    format!(
        "\
You are a programming assistant. Generate clean, well-commented, production-ready code for this request: \"{query}\".
Include proper error handling and follow best practices for the chosen programming language.
Focus on writing efficient, readable code that directly addresses the request."
    )
}

/// Direct branch of the complex pipeline: generate from the raw query.
pub fn generate_direct(query: &str) -> String {
    format!(
        "\
You are a code generation expert. Generate clean, well-commented, production-ready code for: \"{query}\".
Include proper error handling and follow best practices."
    )
}

/// Turn a request into a detailed specification.
pub fn interpret_query(query: &str) -> String {
    format!(
        "You are a programming assistant. Understand this coding request and convert it into a clear, detailed specification: \"{query}\"."
    )
}

/// Interpreted branch: generate from the specification text.
pub fn generate_from_spec(interpretation: &str) -> String {
    format!("Generate clean, well-commented code based on this specification: \"{interpretation}\"")
}

/// Enhancement pass. Carries the original query so customization hints survive.
pub fn enhance_code(query: &str, code: &str) -> String {
    format!(
        "\
Improve this code for better performance, readability, and error handling. Apply any specific customizations \
mentioned in this request: \"{query}\"

Code:
{code}"
    )
}

/// Pick one of two implementations, verbatim.
pub fn select_best(first: &str, second: &str) -> String {
    format!(
        "\
You are a code selection expert. Choose the better implementation that is more correct, efficient, and readable.
IMPLEMENTATION 1:
{first}


IMPLEMENTATION 2:
{second}


Respond with ONLY the complete selected implementation, no explanation needed."
    )
}

/// Final best-practice, security and error-handling pass.
pub fn final_review(code: &str) -> String {
    format!(
        "\
Review this code and ensure it meets industry best practices, security standards, and handles errors properly.
Add thorough comments explaining the key components and any optimizations you've made.
Provide the final, improved version as plain text:

{code}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prompt_embeds_query_and_labels() {
        let prompt = classify_query("reverse a string");
        assert!(prompt.contains("Query: \"reverse a string\""));
        for label in ["\"simple\"", "\"complex\"", "\"ambiguous\""] {
            assert!(prompt.contains(label));
        }
    }

    #[test]
    fn enhance_prompt_carries_query_and_code() {
        let prompt = enhance_code("use iterators", "for i in 0..n {}");
        assert!(prompt.contains("\"use iterators\""));
        assert!(prompt.ends_with("Code:\nfor i in 0..n {}"));
    }

    #[test]
    fn select_prompt_keeps_both_candidates_in_order() {
        let prompt = select_best("AAA", "BBB");
        let a = prompt.find("IMPLEMENTATION 1:\nAAA").unwrap();
        let b = prompt.find("IMPLEMENTATION 2:\nBBB").unwrap();
        assert!(a < b);
        assert!(prompt.contains("no explanation"));
    }

    #[test]
    fn review_prompt_ends_with_code() {
        assert!(final_review("fn x() {}").ends_with("\n\nfn x() {}"));
    }

    #[test]
    fn hedge_phrases_are_lowercase() {
        for phrase in HEDGE_PHRASES {
            assert_eq!(phrase, phrase.to_lowercase());
        }
    }

    #[test]
    fn suffix_asks_for_detail() {
        assert!(MORE_DETAIL_SUFFIX.starts_with("\n\n"));
        assert!(MORE_DETAIL_SUFFIX.contains("more details"));
    }
}
