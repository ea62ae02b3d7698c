//! Prompt assembly for grounded answering

use crate::store::Fragment;

/// Render retrieved fragments as a rank-tagged context block
pub fn build_context(fragments: &[Fragment]) -> String {
    let mut context = String::from("Relevant context:\n\n");
    for (i, fragment) in fragments.iter().enumerate() {
        context.push_str(&format!("[{}] {}\n\n", i + 1, fragment.content));
    }
    context
}

/// Build the full generation prompt: rank-ordered context, then the question,
/// then the instruction that the answer must stay inside the listed context.
/// With zero fragments the context block is empty, which steers the model to
/// the insufficient-information reply by construction.
pub fn build_prompt(question: &str, fragments: &[Fragment]) -> String {
    format!(
        "{context}Question: {question}\n\
         Instructions: Answer the question based ONLY on the context provided. \
         If the information is not in the context, state that you do not have \
         enough information.\n\
         Answer:",
        context = build_context(fragments),
        question = question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(content: &str) -> Fragment {
        Fragment {
            id: 0,
            content: content.to_string(),
            source: "doc1".to_string(),
            distance: 0.0,
        }
    }

    #[test]
    fn fragments_are_tagged_in_rank_order() {
        let prompt = build_prompt("why?", &[fragment("first"), fragment("second")]);
        let first = prompt.find("[1] first").expect("rank 1 present");
        let second = prompt.find("[2] second").expect("rank 2 present");
        assert!(first < second);
    }

    #[test]
    fn question_and_instruction_follow_the_context() {
        let prompt = build_prompt("what is the sky?", &[fragment("the sky is blue")]);
        assert!(prompt.contains("Question: what is the sky?"));
        assert!(prompt.contains("based ONLY on the context"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn empty_retrieval_still_builds_a_prompt() {
        let prompt = build_prompt("anything?", &[]);
        assert!(prompt.starts_with("Relevant context:"));
        assert!(prompt.contains("Question: anything?"));
    }
}
