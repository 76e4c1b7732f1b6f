//! Renders push events as Telegram Markdown messages

use crate::webhook::{Commit, PushEvent};

/// Telegram rejects `sendMessage` text longer than this.
pub const MAX_MESSAGE_CHARS: usize = 4096;
const SHORT_SHA_LEN: usize = 7;
const UNKNOWN_NAME: &str = "unknown";

/// Formats a single commit as one bullet line.
pub fn format_commit_line(commit: &Commit) -> String {
    let short_id: String = commit.id.chars().take(SHORT_SHA_LEN).collect();
    let author = commit
        .author
        .as_ref()
        .and_then(|a| a.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME);

    format!(
        "- {} ([{}]({})) by {} (added: {}, modified: {}, removed: {})",
        commit.message,
        short_id,
        commit.url,
        author,
        count(&commit.added),
        count(&commit.modified),
        count(&commit.removed),
    )
}

fn count(paths: &Option<Vec<String>>) -> usize {
    paths.as_ref().map_or(0, Vec::len)
}

/// Header line naming the pusher and linking the repository.
pub fn format_header(event: &PushEvent) -> String {
    let pusher = Some(event.pusher.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_NAME);
    let mut header = format!(
        "🚀 *{}* pushed to [{}]({})",
        pusher, event.repository.name, event.repository.html_url
    );
    if let Some(branch) = event.branch() {
        header.push_str(&format!(" on `{}`", branch));
    }
    header
}

/// Renders the full notification text for a push event.
///
/// When the text would exceed [`MAX_MESSAGE_CHARS`], trailing commit lines are
/// replaced by a `…and N more commits` line.
pub fn format_push_message(event: &PushEvent) -> String {
    let header = format_header(event);
    let lines: Vec<String> = event.commits.iter().map(format_commit_line).collect();

    if lines.is_empty() {
        return truncate_chars(header, MAX_MESSAGE_CHARS);
    }

    let full = format!("{}\n\n{}", header, lines.join("\n"));
    if full.chars().count() <= MAX_MESSAGE_CHARS {
        return full;
    }

    // Largest prefix of commit lines that still leaves room for the summary.
    let header_len = header.chars().count() + 2;
    let line_lens: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
    for kept in (0..lines.len()).rev() {
        let summary = more_commits_line(lines.len() - kept);
        let body_len: usize = line_lens[..kept].iter().map(|len| len + 1).sum();
        if header_len + body_len + summary.chars().count() <= MAX_MESSAGE_CHARS {
            let mut text = format!("{}\n\n", header);
            for line in &lines[..kept] {
                text.push_str(line);
                text.push('\n');
            }
            text.push_str(&summary);
            return text;
        }
    }

    truncate_chars(
        format!("{}\n\n{}", header, more_commits_line(lines.len())),
        MAX_MESSAGE_CHARS,
    )
}

fn more_commits_line(remaining: usize) -> String {
    if remaining == 1 {
        "…and 1 more commit".to_string()
    } else {
        format!("…and {} more commits", remaining)
    }
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::{CommitAuthor, Pusher, Repository};

    fn reference_commit() -> Commit {
        Commit {
            id: "abcdef1234567".into(),
            message: "fix bug".into(),
            url: "https://x/commit/abcdef1234567".into(),
            author: Some(CommitAuthor {
                name: Some("alice".into()),
            }),
            added: Some(vec!["a.txt".into()]),
            modified: Some(vec![]),
            removed: Some(vec![]),
        }
    }

    fn event_with(commits: Vec<Commit>) -> PushEvent {
        PushEvent {
            git_ref: Some("refs/heads/main".into()),
            pusher: Pusher {
                name: "alice".into(),
            },
            repository: Repository {
                name: "demo".into(),
                html_url: "https://github.com/alice/demo".into(),
            },
            commits,
        }
    }

    #[test]
    fn reference_commit_line() {
        assert_eq!(
            format_commit_line(&reference_commit()),
            "- fix bug ([abcdef1](https://x/commit/abcdef1234567)) by alice (added: 1, modified: 0, removed: 0)"
        );
    }

    #[test]
    fn missing_author_renders_unknown() {
        let mut commit = reference_commit();
        commit.author = None;
        assert!(format_commit_line(&commit).contains(" by unknown ("));

        commit.author = Some(CommitAuthor { name: None });
        assert!(format_commit_line(&commit).contains(" by unknown ("));
    }

    #[test]
    fn empty_names_render_unknown() {
        let mut commit = reference_commit();
        commit.author = Some(CommitAuthor {
            name: Some(String::new()),
        });
        assert!(format_commit_line(&commit).contains(" by unknown ("));

        let mut event = event_with(vec![]);
        event.pusher.name = String::new();
        assert!(format_header(&event).starts_with("🚀 *unknown* pushed to"));
    }

    #[test]
    fn absent_file_lists_count_as_zero() {
        let commit = Commit {
            id: "123".into(),
            message: "m".into(),
            url: "u".into(),
            ..Commit::default()
        };
        assert_eq!(
            format_commit_line(&commit),
            "- m ([123](u)) by unknown (added: 0, modified: 0, removed: 0)"
        );
    }

    #[test]
    fn full_message_layout() {
        let mut second = reference_commit();
        second.id = "9876543210".into();
        second.message = "add docs".into();
        second.url = "https://x/commit/9876543210".into();
        second.modified = Some(vec!["README.md".into(), "docs/a.md".into()]);

        let text = format_push_message(&event_with(vec![reference_commit(), second]));
        assert_eq!(
            text,
            "🚀 *alice* pushed to [demo](https://github.com/alice/demo) on `main`\n\n\
             - fix bug ([abcdef1](https://x/commit/abcdef1234567)) by alice (added: 1, modified: 0, removed: 0)\n\
             - add docs ([9876543](https://x/commit/9876543210)) by alice (added: 1, modified: 2, removed: 0)"
        );
    }

    #[test]
    fn header_without_branch_ref() {
        let mut event = event_with(vec![]);
        event.git_ref = None;
        assert_eq!(
            format_push_message(&event),
            "🚀 *alice* pushed to [demo](https://github.com/alice/demo)"
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let event = event_with(vec![reference_commit(), reference_commit()]);
        assert_eq!(format_push_message(&event), format_push_message(&event));
    }

    #[test]
    fn long_pushes_are_cut_to_telegram_limit() {
        let mut commit = reference_commit();
        commit.message = "x".repeat(200);
        let event = event_with(vec![commit; 100]);

        let text = format_push_message(&event);
        assert!(text.chars().count() <= MAX_MESSAGE_CHARS);
        assert!(text.starts_with("🚀 *alice*"));
        assert!(text.ends_with("more commits"));
    }

    #[test]
    fn single_oversized_commit_is_summarised() {
        let mut commit = reference_commit();
        commit.message = "y".repeat(MAX_MESSAGE_CHARS * 2);
        let text = format_push_message(&event_with(vec![commit]));

        assert!(text.chars().count() <= MAX_MESSAGE_CHARS);
        assert!(text.ends_with("…and 1 more commit"));
    }
}
