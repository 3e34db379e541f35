//! The shared downstream flow of both analyze endpoints: prompt → agent → parse.

use tracing::info;

use crate::agent_client::{AgentError, AgentGraph, AgentMessage};
use crate::analysis::parser::parse_agent_response;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;

/// Runs one full agent turn for the given texts and structures its answer.
/// Blocks (asynchronously) until the agent has finished; no timeout is applied here.
pub async fn run_analysis(
    agent: &dyn AgentGraph,
    resume: &str,
    job_description: &str,
) -> Result<AnalysisResult, AppError> {
    let prompt = build_analysis_prompt(job_description, resume);

    info!("Invoking agent workflow...");
    let run = agent.invoke(vec![AgentMessage::human(prompt)]).await?;

    let final_text = run.final_text().ok_or(AgentError::EmptyHistory)?;
    let result = parse_agent_response(final_text, &run.messages);

    info!(
        "Analysis complete. Match score: {}%, {} videos",
        result.match_score,
        result.learning_plan.len()
    );
    Ok(result)
}
