//! Fixed instruction template.

/// What the prompt says about the feed being summarized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    /// Account handle, without `@`.
    pub account: String,
    pub window_days: u32,
}

/// Build the instruction prompt with `posts` embedded verbatim.
#[must_use]
pub fn build_prompt(ctx: &PromptContext, posts: &str) -> String {
    format!(
        r"You are reviewing the last {days} days of posts from @{account}.

Extract the significant development updates. For each one, produce a JSON object with:
- title: short headline for the update (at most 60 characters)
- category: one of technical, partnership, business, milestone, community, other
- impact: one of high, medium, low
- summary: one or two sentences describing the development
- key_points: array of 2-3 short strings with the key details

Prioritize:
- product milestones and feature releases
- technical achievements and benchmarks
- partnerships and integrations
- business metrics and funding
- community events and engagement

Order the updates by date, most recent first, and leave out routine chatter.

Posts:
{posts}

Respond with ONLY a JSON array of update objects. Do not wrap it in markdown.",
        days = ctx.window_days,
        account = ctx.account,
    )
}
