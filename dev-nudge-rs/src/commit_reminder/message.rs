//! Reminder text shown to the user on stderr.

use chrono::{DateTime, Utc};

use super::state::ReminderState;
use crate::git_status::RepoStatus;

/// Paths listed per category before the list is cut off.
const MAX_LISTED_FILES: usize = 3;

const GUIDANCE: &str = "

📋 **Industry Standard Recommendations:**
• Commit early and often to prevent work loss
• Use atomic commits (one logical change per commit)
• Write clear, descriptive commit messages
• Consider using conventional commit format: `type(scope): description`

🏷️ **Common commit types:** feat, fix, docs, style, refactor, test, chore

💡 **Example good commit message:**
`feat(auth): add token refresh on session resume`

⚡ **Quick commit commands:**
```bash
git add -A && git commit -m \"your message here\"
# or for conventional commits:
git add -A && git commit -m \"feat: your feature description\"
```";

pub fn compose(
    time_due: bool,
    state: &ReminderState,
    status: &RepoStatus,
    now: DateTime<Utc>,
) -> String {
    let mut lines = Vec::new();

    if time_due {
        let minutes = (now - state.session_start_time).num_milliseconds() as f64 / 60_000.0;
        lines.push(format!(
            "⏰ **COMMIT REMINDER**: You've been working for {minutes:.0} minutes."
        ));
    }

    if status.has_changes() {
        lines.push(format!(
            "📝 **{} files have changes** that should be committed.",
            status.total_changes()
        ));
        if !status.modified.is_empty() {
            lines.push(format!("   Modified: {}", first_paths(status.modified.iter())));
        }
        if !status.untracked.is_empty() {
            lines.push(format!("   New files: {}", first_paths(status.untracked.iter())));
        }
    }

    let mut message = lines.join("\n");
    message.push_str(GUIDANCE);
    message
}

fn first_paths<'a>(paths: impl Iterator<Item = &'a String>) -> String {
    paths
        .take(MAX_LISTED_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
