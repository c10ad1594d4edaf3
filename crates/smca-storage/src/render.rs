//! Artifact rendering.

use std::collections::HashMap;
use std::fmt::Write as _;

use smca_models::{
    Comment, Platform, PostMetadata, SentimentLabel, SentimentResult, SentimentSummary,
};

use crate::error::{StorageError, StorageResult};

/// Number of commenters listed in the metadata report.
pub const TOP_COMMENTERS: usize = 5;

const RULE_WIDTH: usize = 50;

const COMMENTS_HEADER: [&str; 7] = [
    "Username",
    "Comment",
    "Comment ID",
    "Platform",
    "Likes",
    "Is Reply",
    "Parent Comment ID",
];

const SENTIMENT_HEADER: [&str; 3] = ["Comment", "Sentiment", "Sentiment Score"];

/// First column of the trailing aggregate row in the sentiment table.
pub const AGGREGATE_LABEL: &str = "Aggregate";

/// Render the comments table.
pub fn comments_csv(comments: &[Comment]) -> StorageResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COMMENTS_HEADER)?;

    for comment in comments {
        let likes = comment.like_count.to_string();
        let parent = if comment.is_reply {
            comment.parent_id.as_deref().unwrap_or("")
        } else {
            "Null"
        };
        writer.write_record([
            comment.author_or_anonymous(),
            comment.text.as_str(),
            comment.comment_id.as_str(),
            comment.platform.display_name(),
            likes.as_str(),
            if comment.is_reply { "Yes" } else { "No" },
            parent,
        ])?;
    }

    finish(writer)
}

/// Render the per-comment sentiment table followed by one aggregate row.
///
/// `results` must hold exactly one entry per comment.
pub fn sentiment_csv(comments: &[Comment], results: &[SentimentResult]) -> StorageResult<Vec<u8>> {
    let by_ref = index_results(comments, results)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SENTIMENT_HEADER)?;

    for (comment, result) in comments.iter().zip(by_ref.iter()) {
        let score = format!("{:.4}", result.score);
        writer.write_record([
            comment.text.as_str(),
            result.label.display_name(),
            score.as_str(),
        ])?;
    }

    let summary = SentimentSummary::from_results(results);
    let distribution = format!(
        "positive={};neutral={};negative={}",
        summary.positive, summary.neutral, summary.negative
    );
    let total = summary.total().to_string();
    writer.write_record([AGGREGATE_LABEL, distribution.as_str(), total.as_str()])?;

    finish(writer)
}

/// Render the metadata report.
///
/// When comments were analysed, the report also carries the sentiment
/// distribution and the most active commenters.
pub fn metadata_text(
    platform: Platform,
    metadata: &PostMetadata,
    analysis: Option<(&[Comment], &SentimentSummary)>,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "Metadata for {} content:", platform.display_name());
    let _ = writeln!(out, "{}", rule);
    for (key, value) in metadata.iter() {
        let _ = writeln!(out, "{}: {}", key, value);
    }

    if let Some((comments, summary)) = analysis {
        let _ = writeln!(out, "\nSentiment Analysis Report:");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Total Comments: {}", summary.total());
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            let _ = writeln!(
                out,
                "{}: {} ({:.1}%)",
                label.display_name(),
                summary.count(label),
                summary.percentage(label)
            );
        }

        let top = top_commenters(comments, TOP_COMMENTERS);
        if !top.is_empty() {
            let _ = writeln!(out, "\nTop Commenters:");
            let _ = writeln!(out, "{}", rule);
            for (i, (name, count)) in top.iter().enumerate() {
                let _ = writeln!(out, "{}. {} ({})", i + 1, name, count);
            }
        }
    }

    out
}

/// Most frequent authors, ties broken by first appearance.
pub fn top_commenters(comments: &[Comment], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, comment) in comments.iter().enumerate() {
        let entry = counts
            .entry(comment.author_or_anonymous())
            .or_insert((0, position));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(name, (count, first))| (name, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, count, _)| (name.to_string(), count))
        .collect()
}

/// Order results by `comment_ref`, checking there is one per comment.
fn index_results<'a>(
    comments: &[Comment],
    results: &'a [SentimentResult],
) -> StorageResult<Vec<&'a SentimentResult>> {
    if comments.len() != results.len() {
        return Err(StorageError::InvalidInput(format!(
            "{} sentiment results for {} comments",
            results.len(),
            comments.len()
        )));
    }

    let mut slots: Vec<Option<&SentimentResult>> = vec![None; comments.len()];
    for result in results {
        match slots.get_mut(result.comment_ref) {
            Some(slot @ None) => *slot = Some(result),
            Some(Some(_)) => {
                return Err(StorageError::InvalidInput(format!(
                    "duplicate sentiment result for comment {}",
                    result.comment_ref
                )))
            }
            None => {
                return Err(StorageError::InvalidInput(format!(
                    "sentiment result refers to missing comment {}",
                    result.comment_ref
                )))
            }
        }
    }

    // Lengths match and no slot was filled twice, so every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> StorageResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| StorageError::Io(e.into_error()))
}
