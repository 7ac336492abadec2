/// System instruction for every analysis. Asks for a fixed four-section answer.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert technical career coach. \
Compare the candidate's resume to the position description. \
Identify skill gaps, missing keywords, and concrete improvements. \
Output structured advice in four sections:\n\
1. Overall Fit Summary (2-3 sentences)\n\
2. Missing or Weak Keywords/Skills (bullet list)\n\
3. Resume Improvement Suggestions (bullet list)\n\
4. General Job-Search Advice (150 words or fewer)";

const RESUME_MARKER: &str = "[RESUME]";
const JOB_DESCRIPTION_MARKER: &str = "[JOB_DESCRIPTION]";

/// Returns `(system_prompt, user_prompt)`. Inputs are inserted as-is, no escaping.
pub fn build_prompt(resume: &str, job_description: &str) -> (String, String) {
    let user_prompt =
        format!("{RESUME_MARKER}\n{resume}\n\n{JOB_DESCRIPTION_MARKER}\n{job_description}");
    (ANALYSIS_SYSTEM_PROMPT.to_string(), user_prompt)
}
