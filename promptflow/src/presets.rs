//! Built-in stage catalogs.
//!
//! Two ready-made pipelines ship with the crate. Both are ordinary
//! two-stage pipelines; the runner has no special-cased logic for either.

use crate::pipeline::Pipeline;
use crate::stage::StageDefinition;

/// Initial input key for the raw prompt given to [`prompt_refinement`].
pub const USER_PROMPT: &str = "user_prompt";

/// Initial input key naming the model [`prompt_refinement`] optimizes for.
pub const TARGET_MODEL: &str = "target_model";

/// Initial input key for the post topic given to [`social_content`].
pub const TOPIC: &str = "topic";

/// Initial input key for the post platform given to [`social_content`].
pub const PLATFORM: &str = "platform";

/// Structure-then-optimize prompt refinement.
///
/// Stage `structure` rewrites a raw `{user_prompt}` into a sectioned
/// Markdown prompt; stage `optimize` tailors the structured prompt to
/// `{target_model}` and returns only the final prompt text. The optimizer's
/// instructions name the actual target model through the binding rather
/// than hard-coding a provider name.
#[must_use]
#[allow(clippy::expect_used)]
pub fn prompt_refinement() -> Pipeline {
    let structure = StageDefinition::new(
        "structure",
        "You are an expert prompt engineer. Be concise and practical.",
        "Given the user's prompt:\n\n\
         {user_prompt}\n\n\
         Improve its structure and clarity. Ensure the prompt is complete and unambiguous. \
         Return the rewritten prompt in Markdown with the sections: \
         1) Objective  2) Context  3) Constraints  4) Steps/Guidelines  5) Output Format.",
    )
    .with_expected_output(
        "A rewritten prompt in Markdown with the sections Objective, Context, \
         Constraints, Steps/Guidelines and Output Format.",
    );

    let optimize = StageDefinition::new(
        "optimize",
        "You optimize prompts for the {target_model} model.",
        "Take the structured prompt below and optimize it for the target model: {target_model}. \
         Follow that model's best practices for instruction style, examples if helpful, and \
         token efficiency. Return ONLY the final prompt text, no explanations.\n\n\
         {structure}",
    )
    .with_expected_output(
        "A final optimized prompt ready to be sent to the target model, with no \
         surrounding explanations.",
    );

    Pipeline::new("prompt-refinement", vec![structure, optimize])
        .expect("built-in pipeline is valid")
}

/// Create-then-moderate social content.
///
/// Stage `content` writes a post for `{topic}` on `{platform}`; stage
/// `moderation` reviews the generated post and returns either the unchanged
/// text or a rewritten safe version.
#[must_use]
#[allow(clippy::expect_used)]
pub fn social_content() -> Pipeline {
    let content = StageDefinition::new(
        "content",
        "You are an experienced social media manager skilled in creating tailored posts \
         for each platform.",
        "Create a social media post about the topic '{topic}' for the '{platform}' platform. \
         Make it engaging, helpful, clear, and professional. Keep it concise. \
         Return ONLY the post text, no extra explanations.",
    )
    .with_expected_output("A well-written post text suitable for the target platform.");

    let moderation = StageDefinition::new(
        "moderation",
        "You are a content safety moderator verifying that generated content is compliant \
         and free of harmful language.",
        "Review the post below for safety and appropriateness. Ensure it has no offensive, \
         violent, discriminatory, medical or legal risk claims, or sensitive personal data. \
         If issues exist, rewrite a safe version; otherwise return the approved text \
         unchanged.\n\n\
         {content}",
    )
    .with_expected_output("A safe, approved version of the post ready for publishing.");

    Pipeline::new("social-content", vec![content, moderation])
        .expect("built-in pipeline is valid")
}
