// Instruction template sent to the external agent graph.
// The wording is a contract with the agent's tools and final-answer format; do not edit casually.

/// Fixed numbered directives appended after the job description and resume.
pub const ANALYSIS_DIRECTIVES: &str = "Step 1: Compare them and calculate a percentage match score. \
    Step 2: If the score is under 100%, identify the TOP missing skill. \
    Step 3: Use the video tool to find 3 specific YouTube videos for that missing skill. \
    Step 4: Final output should be the Score, the Reasoning, and the Video Links.";

/// Renders the single instruction message, embedding both texts verbatim.
pub fn build_analysis_prompt(job_description: &str, resume: &str) -> String {
    format!(
        "Here is a Job Description: {job_description} \n\n\
         Here is a Resume: {resume} \n\n\
         {ANALYSIS_DIRECTIVES}"
    )
}
