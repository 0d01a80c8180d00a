// Prompt constants for the external recommendation strategy.

/// System prompt for recommendation requests. Enforces JSON-only output.
pub const RECOMMEND_SYSTEM: &str =
    "You are a career mentor for healthcare and technology students. \
    You suggest concrete online courses and hands-on projects that close skill gaps. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace `{role}`, `{weak}` and `{missing}` before sending.
pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"A student is preparing for the career goal "{role}".

Skills they have but below the required level (improve these first):
{weak}

Skills they do not have yet:
{missing}

Return a JSON object with this EXACT schema:
{
  "recommendations": [
    {
      "type": "course",
      "title": "ECG Interpretation Fundamentals",
      "provider": "Coursera",
      "tags": ["ECG Interpretation", "Cardiology"],
      "purpose": "Improve ECG Interpretation",
      "duration": "6 Weeks",
      "rating": 4.7
    }
  ],
  "explanation": "Two or three sentences of mentoring advice."
}

Rules:
- "type" is either "course" or "project".
- Every item targets exactly one of the skills listed above; put that skill name in "tags" and "purpose".
- "purpose" starts with "Improve " for the first list and "Learn " for the second.
- Order items weak skills first, then missing skills, then one capstone project for the role.
- Use real, well-known providers. Do not invent URLs."#;

fn bullet_list(skills: &[String]) -> String {
    if skills.is_empty() {
        return "- (none)".to_string();
    }
    skills
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_recommend_prompt(role: &str, weak: &[String], missing: &[String]) -> String {
    RECOMMEND_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{weak}", &bullet_list(weak))
        .replace("{missing}", &bullet_list(missing))
}
