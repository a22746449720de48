// Prompt constants and assembly for the enhancement dispatcher.
// One template serves all backends; only the wire format differs per adapter.

/// Fixed system instruction prefixed to every enhancement prompt.
pub const ENHANCE_SYSTEM: &str = "You are a professional resume writer.";

/// Instruction line that precedes the resume content.
pub const ENHANCE_INSTRUCTION: &str =
    "Enhance the following resume content to make it more effective and impactful:";

/// Assembles the full prompt: system line, optional objective line, then the
/// instruction and the content separated by a blank line.
pub fn build_enhance_prompt(content: &str, objective: Option<&str>) -> String {
    let mut prompt = String::with_capacity(content.len() + 128);
    prompt.push_str(ENHANCE_SYSTEM);
    prompt.push('\n');
    if let Some(objective) = objective.map(str::trim).filter(|o| !o.is_empty()) {
        prompt.push_str("Objective: ");
        prompt.push_str(objective);
        prompt.push('\n');
    }
    prompt.push_str(ENHANCE_INSTRUCTION);
    prompt.push_str("\n\n");
    prompt.push_str(content);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_objective() {
        let prompt = build_enhance_prompt("CONTENT", None);
        assert_eq!(
            prompt,
            "You are a professional resume writer.\n\
             Enhance the following resume content to make it more effective and impactful:\n\n\
             CONTENT"
        );
    }

    #[test]
    fn test_prompt_with_objective() {
        let prompt = build_enhance_prompt("CONTENT", Some("Senior backend role"));
        assert!(prompt.contains("Objective: Senior backend role\n"));
        assert!(prompt.ends_with("\n\nCONTENT"));
    }

    #[test]
    fn test_blank_objective_is_omitted() {
        let prompt = build_enhance_prompt("CONTENT", Some("   "));
        assert!(!prompt.contains("Objective:"));
    }
}
