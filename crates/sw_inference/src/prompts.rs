//! Prompt templates for every stage of the pipeline. Each output style
//! carries the system instruction for one kind of call; the free
//! functions build the matching user prompts.

const ARTICLE: &str = "You are a careful research assistant. Read the reference material \
inside the <content> tags and write a focused, well-organized summary of everything in it \
that is relevant to the topic inside the <topic> tags. Use only information found in the \
material. Answer in the language of the topic.";

const OUTLINE_GEN: &str = "You are an editor planning a long-form article. From the \
reference material inside the <content> tags, draft an outline for an article on the topic \
inside the <topic> tags. Answer with a single JSON object of the form \
{\"title\": string, \"summary\": string, \"content_outline\": [{\"h1\": string, \
\"description\": string}]} and output nothing besides that JSON object.";

const OUTLINE_MERGE: &str = "You are an editor consolidating several draft outlines for the \
same article. The <content> tags contain the drafts; the <topic> tags contain the article's \
topic. Merge the drafts into one coherent outline, removing duplicates and ordering the \
sections logically. Answer with a single JSON object of the form \
{\"title\": string, \"summary\": string, \"content_outline\": [{\"h1\": string, \
\"description\": string}]} and output nothing besides that JSON object.";

const SECTION_BODY: &str = "You are writing one section of a long-form article. Follow the \
full outline you are given so the section fits the overall structure, write flowing prose \
under the requested heading, and do not repeat content that belongs to other sections. \
Ground everything you write in the material provided.";

const FINAL_SUMMARY: &str = "You are a careful research assistant. The <content> tags \
contain digests of several sources on the topic inside the <topic> tags. Combine them into \
a single comprehensive answer, resolving overlap and contradictions, in the language of \
the topic.";

/// Output styles for language-model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Free-form summary of one source.
    Article,
    /// Per-source outline candidate, answered as JSON.
    OutlineGen,
    /// Merge of several outline candidates into one JSON outline.
    OutlineMerge,
    /// Section excerpts and expansions.
    SectionBody,
    /// One-shot merged answer over per-source digests.
    FinalSummary,
}

impl OutputStyle {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            OutputStyle::Article => ARTICLE,
            OutputStyle::OutlineGen => OUTLINE_GEN,
            OutputStyle::OutlineMerge => OUTLINE_MERGE,
            OutputStyle::SectionBody => SECTION_BODY,
            OutputStyle::FinalSummary => FINAL_SUMMARY,
        }
    }
}

/// Prompt for one independent per-source call.
pub fn source_prompt(content: &str, topic: &str) -> String {
    format!("## Reference material: <content>{content}</content> ## Topic: <topic>{topic}</topic>")
}

/// Prompt for the outline-merge call.
pub fn merge_prompt(topic: &str, outlines: &str) -> String {
    format!("<topic>{topic}</topic> <content>{outlines}</content>")
}

/// The "topic" circulated to per-source calls when gathering excerpts
/// for one outline section.
pub fn section_question(outline_json: &str, section: &str) -> String {
    format!(
        "<outline>{outline_json}</outline> Based on the outline above, write the following \
         part >>> {section} <<<"
    )
}

/// Prompt for the final expansion of one section from gathered excerpts.
pub fn section_expansion_prompt(outline_json: &str, excerpts: &str, section: &str) -> String {
    format!(
        "<outline>{outline_json}</outline> <material>{excerpts}</material> Based on the \
         outline and material above, write this part of the outline: {section}"
    )
}

/// Prompt for the one-shot research summary.
pub fn final_summary_prompt(topic: &str, digests: &str) -> String {
    format!("<topic>{topic}</topic> <content>{digests}</content>")
}
