// Resume ↔ job description analysis.
// Prompt construction, agent invocation, and parsing of the agent's answer into an AnalysisResult.
// All agent calls go through agent_client — handlers never talk to the agent server directly.

pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod tool_payload;
