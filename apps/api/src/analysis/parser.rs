//! Response Parser — turns the agent's final answer and conversation trace into an `AnalysisResult`.
//!
//! Never fails. Every field degrades to a default instead:
//! - score: first `N%` in the final text, else 0
//! - reason: the final text, trimmed
//! - learning plan: first tool message yielding videos, else `* title: youtube-url` bullets
//!   in the final text, else empty

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::agent_client::AgentMessage;
use crate::analysis::tool_payload::{decode_tool_payload, ToolPayload, ToolVideo};
use crate::models::analysis::{AnalysisResult, VideoRecord};

const MAX_SCORE: u32 = 100;

static RE_SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)%").unwrap());

static RE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d$").unwrap());

static RE_VIDEO_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\s*([^\n]+?):\s*(https://www\.youtube\.com/watch\?v=[^\s]+)").unwrap()
});

/// Builds the structured result from the agent's last message and full history.
pub fn parse_agent_response(final_text: &str, history: &[AgentMessage]) -> AnalysisResult {
    let mut learning_plan = videos_from_tool_messages(history);
    if learning_plan.is_empty() {
        learning_plan = videos_from_text(final_text);
    }

    AnalysisResult {
        match_score: extract_match_score(final_text),
        reason: final_text.trim().to_string(),
        learning_plan,
    }
}

/// First integer immediately followed by `%`. Later percentages never win.
/// Any Unicode decimal digits count (`７３%` is 73). Values past 100 are clamped to 100.
pub fn extract_match_score(text: &str) -> u32 {
    RE_SCORE
        .captures(text)
        .map(|caps| decimal_value(&caps[1]).map_or(MAX_SCORE, |n| n.min(MAX_SCORE)))
        .unwrap_or(0)
}

/// Value of a run of decimal digits; `None` on overflow.
fn decimal_value(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}

/// Decimal value of one `\d` character.
///
/// Unicode lays out every decimal digit set as contiguous 0..=9 blocks, and adjacent
/// blocks stay aligned, so the offset from the start of the contiguous digit range
/// modulo 10 is the value.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    let is_digit = |cp: u32| {
        char::from_u32(cp).is_some_and(|ch| RE_DIGIT.is_match(ch.encode_utf8(&mut [0; 4])))
    };
    let cp = c as u32;
    if !is_digit(cp) {
        return None;
    }
    let mut start = cp;
    while start > 0 && is_digit(start - 1) {
        start -= 1;
    }
    Some((cp - start) % 10)
}

/// Videos from the first tool message that yields at least one linked record.
/// Results are never merged across tool messages.
fn videos_from_tool_messages(history: &[AgentMessage]) -> Vec<VideoRecord> {
    for (index, message) in history.iter().enumerate() {
        let AgentMessage::Tool { content, .. } = message else {
            continue;
        };
        match decode_tool_payload(content) {
            ToolPayload::Records(records) => {
                let videos: Vec<VideoRecord> =
                    records.into_iter().filter_map(project_video).collect();
                if !videos.is_empty() {
                    debug!("Using {} videos from tool message #{index}", videos.len());
                    return videos;
                }
                debug!("Tool message #{index} has records but none with a link");
            }
            ToolPayload::Empty => debug!("Tool message #{index} returned an empty list"),
            ToolPayload::Unreadable(reason) => {
                debug!("Tool message #{index} is not a record list: {reason}")
            }
        }
    }
    Vec::new()
}

fn project_video(record: ToolVideo) -> Option<VideoRecord> {
    let link = record.link.filter(|l| !l.is_empty())?;
    Some(VideoRecord {
        title: record.title.unwrap_or_default(),
        video: link,
        thumbnail: record.thumbnail.unwrap_or_default(),
    })
}

/// `* Title: https://www.youtube.com/watch?v=...` bullets narrated in the final answer.
fn videos_from_text(text: &str) -> Vec<VideoRecord> {
    RE_VIDEO_BULLET
        .captures_iter(text)
        .map(|caps| VideoRecord {
            title: caps[1].trim().to_string(),
            video: caps[2].to_string(),
            thumbnail: String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, url: &str, thumbnail: &str) -> VideoRecord {
        VideoRecord {
            title: title.to_string(),
            video: url.to_string(),
            thumbnail: thumbnail.to_string(),
        }
    }

    const NARRATED_ANSWER: &str = "**Score: 73%**\n\
        Your resume covers Rust and gRPC but lacks Kubernetes (needed in 90% of the role).\n\
        Learning plan:\n\
        * Kubernetes in 100 Seconds: https://www.youtube.com/watch?v=PziYflu8cB8\n\
        * Kubernetes Course - Full Beginners Tutorial: https://www.youtube.com/watch?v=d6WC5n9G_sM\n";

    #[test]
    fn test_first_percentage_wins() {
        assert_eq!(extract_match_score("Match: 73%. Top videos cover 100% of it, 45% faster."), 73);
        assert_eq!(extract_match_score(NARRATED_ANSWER), 73);
    }

    #[test]
    fn test_no_percentage_scores_zero() {
        assert_eq!(extract_match_score("I could not compare these documents."), 0);
        assert_eq!(extract_match_score("Score: seventy percent"), 0);
        assert_eq!(extract_match_score(""), 0);
    }

    #[test]
    fn test_percent_must_follow_digits_directly() {
        assert_eq!(extract_match_score("about 40 % overall, 55% on skills"), 55);
    }

    #[test]
    fn test_non_ascii_digits_keep_their_value() {
        assert_eq!(extract_match_score("Score: ７３% match"), 73);
        assert_eq!(extract_match_score("نسبة التطابق ٤٥%"), 45);
        assert_eq!(extract_match_score("मिलान ९०%"), 90);
    }

    #[test]
    fn test_digit_value_across_adjacent_digit_blocks() {
        // Mathematical bold and double-struck digits sit back to back.
        assert_eq!(digit_value('\u{1D7CE}'), Some(0));
        assert_eq!(digit_value('\u{1D7D7}'), Some(9));
        assert_eq!(digit_value('\u{1D7D8}'), Some(0));
        assert_eq!(digit_value('\u{1D7DD}'), Some(5));
        assert_eq!(digit_value('x'), None);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        assert_eq!(extract_match_score("150% match"), 100);
        assert_eq!(extract_match_score("99999999999999999999% match"), 100);
    }

    #[test]
    fn test_score_extraction_is_idempotent_on_reason() {
        let result = parse_agent_response(NARRATED_ANSWER, &[]);
        assert_eq!(extract_match_score(&result.reason), result.match_score);
    }

    #[test]
    fn test_reason_is_trimmed_full_text() {
        let result = parse_agent_response("\n  Score 60%: missing Docker.  \n", &[]);
        assert_eq!(result.reason, "Score 60%: missing Docker.");
    }

    #[test]
    fn test_tool_message_videos_take_precedence() {
        let history = vec![
            AgentMessage::human("prompt"),
            AgentMessage::tool("[{'title': 'X', 'link': 'https://y', 'thumbnail': 't'}]"),
            AgentMessage::ai(NARRATED_ANSWER),
        ];
        let result = parse_agent_response(NARRATED_ANSWER, &history);
        assert_eq!(result.learning_plan, vec![video("X", "https://y", "t")]);
    }

    #[test]
    fn test_numeric_title_does_not_drop_linked_record() {
        let history = vec![AgentMessage::tool(
            "[{'title': 2024, 'link': 'https://a', 'thumbnail': 't'}]",
        )];
        let result = parse_agent_response("30%", &history);
        assert_eq!(result.learning_plan, vec![video("2024", "https://a", "t")]);
    }

    #[test]
    fn test_records_without_link_are_dropped() {
        let history = vec![AgentMessage::tool(
            "[{'title': 'A', 'link': 'https://a'}, {'title': 'B'}, {'title': 'C', 'link': ''}]",
        )];
        let result = parse_agent_response("50%", &history);
        assert_eq!(result.learning_plan, vec![video("A", "https://a", "")]);
    }

    #[test]
    fn test_first_yielding_tool_message_wins_without_merging() {
        let history = vec![
            AgentMessage::tool("search failed: quota exceeded"),
            AgentMessage::tool("[]"),
            AgentMessage::tool("[{'title': 'First', 'link': 'https://1'}]"),
            AgentMessage::tool("[{'title': 'Second', 'link': 'https://2'}]"),
        ];
        let result = parse_agent_response("40%", &history);
        assert_eq!(result.learning_plan, vec![video("First", "https://1", "")]);
    }

    #[test]
    fn test_text_fallback_when_no_tool_message_has_links() {
        let history = vec![AgentMessage::tool("[{'title': 'no link here'}]")];
        let text = "Score: 20%\n* Intro to Docker: https://www.youtube.com/watch?v=abc123";
        let result = parse_agent_response(text, &history);
        assert_eq!(
            result.learning_plan,
            vec![video("Intro to Docker", "https://www.youtube.com/watch?v=abc123", "")]
        );
    }

    #[test]
    fn test_text_fallback_reads_every_bullet() {
        let result = parse_agent_response(NARRATED_ANSWER, &[AgentMessage::human("prompt")]);
        assert_eq!(
            result.learning_plan,
            vec![
                video(
                    "Kubernetes in 100 Seconds",
                    "https://www.youtube.com/watch?v=PziYflu8cB8",
                    ""
                ),
                video(
                    "Kubernetes Course - Full Beginners Tutorial",
                    "https://www.youtube.com/watch?v=d6WC5n9G_sM",
                    ""
                ),
            ]
        );
    }

    #[test]
    fn test_non_youtube_links_are_ignored_by_text_fallback() {
        let text = "10%\n* Docs: https://kubernetes.io/docs\n* Video: http://www.youtube.com/watch?v=x";
        assert!(parse_agent_response(text, &[]).learning_plan.is_empty());
    }

    #[test]
    fn test_nothing_found_yields_defaults() {
        let result = parse_agent_response("The agent gave up.", &[AgentMessage::tool("oops")]);
        assert_eq!(result.match_score, 0);
        assert_eq!(result.reason, "The agent gave up.");
        assert!(result.learning_plan.is_empty());
    }
}
