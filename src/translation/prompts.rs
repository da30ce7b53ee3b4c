/*!
 * Prompt builders for the three pipeline stages.
 */

/// System instruction for the draft translation.
pub const TRANSLATOR_SYSTEM: &str = "You are a professional translator. Translate from {source_language} to {target_language}. Provide only the translation without explanations.";

/// Evaluation rubric sent to the feedback stage.
pub const FEEDBACK_TEMPLATE: &str = r#"You are a strict evaluator for translation quality.

Original ({source_language}):
{original}

Translation ({target_language}):
{translation}

Check these:
1) Is the translation fully in {target_language}?
2) Is meaning preserved (no missing/added information)?
3) Are numbers/dates/proper nouns preserved?
4) Is it natural and idiomatic?

Return STRICT JSON:
{
  "checks": {
    "target_language_ok": true/false,
    "meaning_ok": true/false,
    "numbers_preserved": true/false,
    "naturalness_ok": true/false
  },
  "feedback": "1-3 sentences",
  "decision": "ACCEPT" or "REVISE"
}"#;

/// Reflection instructions sent to the reviewer stage.
pub const REVIEW_TEMPLATE: &str = r#"You are a translation reviewer and refiner.

User asked for translation {source_language} -> {target_language}.

Original:
{original}

Draft translation:
{draft}

External feedback (JSON):
{feedback}

Step 1: Briefly explain whether you agree with the feedback (or confirm the draft is excellent).
Step 2: If your decision is REVISE, output an improved translation. If ACCEPT, repeat the draft.

Return STRICT JSON:
{
  "feedback": "...",
  "final_translation": "...",
  "decision": "ACCEPT" or "REVISE"
}"#;

/// Substitute `{name}` placeholders in a single pass over the template
///
/// Values are never rescanned, so user text containing `{...}` is left as is.
/// Braces that do not name a variable (the JSON schema) are kept literally.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// System prompt for the translator stage
pub fn translator_system_prompt(source_language: &str, target_language: &str) -> String {
    render(
        TRANSLATOR_SYSTEM,
        &[("source_language", source_language), ("target_language", target_language)],
    )
}

/// User prompt for the feedback stage
pub fn feedback_prompt(
    original: &str,
    translation: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    render(
        FEEDBACK_TEMPLATE,
        &[
            ("source_language", source_language),
            ("target_language", target_language),
            ("original", original),
            ("translation", translation),
        ],
    )
}

/// User prompt for the reviewer stage
pub fn review_prompt(
    original: &str,
    draft: &str,
    feedback_payload: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    render(
        REVIEW_TEMPLATE,
        &[
            ("source_language", source_language),
            ("target_language", target_language),
            ("original", original),
            ("draft", draft),
            ("feedback", feedback_payload),
        ],
    )
}
