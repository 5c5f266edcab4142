//! Fixed instruction templates for the generative-text service.

/// Prompt asking for a neutral markdown summary of the collected sources.
pub fn summary_prompt(query: &str, context: &str) -> String {
    format!(
        "Using the user's search query and the information collected from the web below, \
write a comprehensive, easy-to-understand summary.

# Search query:
{query}

# Information collected from the web:
{context}

# Rules for the summary:
- Use markdown and organise the important points as bullet points.
- Add a brief explanation for any technical terms or jargon.
- Keep the whole summary neutral and objective.

# Summary:
"
    )
}

/// Prompt asking for one four-option question as a strict JSON object.
pub fn quiz_prompt(query: &str, summary: &str) -> String {
    format!(
        "Based only on the search history below (a search query and an AI-written summary), \
write one high-quality four-option multiple-choice question that checks understanding of the content.
Respond with a single JSON object in exactly this shape and nothing else:

{{
  \"question\": \"(the question text)\",
  \"options\": [\"(option 1)\", \"(option 2)\", \"(option 3)\", \"(option 4)\"],
  \"answer\": \"(the exact text of the correct option)\",
  \"explanation\": \"(a careful explanation of why that option is correct)\"
}}

# Search history:
## Query:
{query}

## Summary:
{summary}
"
    )
}
