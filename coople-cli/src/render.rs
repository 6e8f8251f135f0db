//! Terminal rendering for sessions, suggestions and stats.
use colored::Colorize;
use coople_game::constants::MAX_GUESSES;
use coople_game::{
    DailySession, PlaybackProgress, PuzzleStorage, PuzzleUnavailable, SongEntry, StatsRecord,
};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 24;
const METER_WIDTH: usize = 30;

pub fn banner() -> String {
    format!(
        "{}\n{}",
        "🎵 Coople".bright_cyan().bold(),
        "==========".cyan()
    )
}

/// Guess rows plus empty slots, the reveal window and any result text.
pub fn session<S: PuzzleStorage + ?Sized>(session: &DailySession<'_, S>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Puzzle {}", session.date().to_string().bold());
    let state = session.state();
    for (idx, (guess, correct)) in state.marked_guesses().enumerate() {
        let mark = if correct { "✔".green() } else { "✘".red() };
        let _ = writeln!(out, "  {}. {mark} {guess}", idx + 1);
    }
    for idx in state.guess_count()..MAX_GUESSES {
        let _ = writeln!(out, "  {}. {}", idx + 1, "-".dimmed());
    }
    let sprite = session.current_sprite();
    let _ = writeln!(
        out,
        "Unlocked: {}s ({})",
        sprite.duration_ms() / 1000,
        sprite.name
    );
    if let Some(message) = session.result_message() {
        let _ = writeln!(out, "{}", message.bright_yellow().bold());
    }
    if let Some(answer) = session.revealed_answer() {
        let _ = writeln!(out, "Answer: {}", answer.display_name.bold());
    }
    if let Some(url) = session.embed_url() {
        let _ = writeln!(out, "Listen: {url}");
    }
    out
}

pub fn unavailable(reason: &PuzzleUnavailable) -> String {
    format!("{}\n{reason}", reason.headline().bright_red().bold())
}

pub fn suggestions(hits: &[&SongEntry]) -> String {
    if hits.is_empty() {
        return "No matches.".dimmed().to_string();
    }
    hits.iter()
        .map(|song| format!("  {}", song.display_name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[=====     ] m:ss / m:ss`
pub fn meter(progress: &PlaybackProgress) -> String {
    let filled = scaled(progress.position_ms, progress.window_ms, METER_WIDTH);
    format!(
        "[{}{}] {}",
        "=".repeat(filled).green(),
        " ".repeat(METER_WIDTH - filled),
        progress.label()
    )
}

pub fn stats(record: &StatsRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Played: {}  Won: {}  Win %: {}",
        record.total,
        record.wins(),
        record.win_percent()
    );
    let dist = record.distribution();
    let peak = dist.iter().copied().chain([record.lose]).max().unwrap_or(0);
    let rows = dist
        .iter()
        .enumerate()
        .map(|(idx, &count)| ((idx + 1).to_string(), count))
        .chain([("X".to_string(), record.lose)]);
    for (label, count) in rows {
        let width = scaled(u64::from(count), u64::from(peak), BAR_WIDTH);
        let _ = writeln!(out, "  {label} {} {count}", "█".repeat(width).cyan());
    }
    out
}

/// Cells out of `width` covered by `part / whole`, rounded down.
fn scaled(part: u64, whole: u64, width: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    let cells = part.min(whole).saturating_mul(width as u64) / whole;
    usize::try_from(cells).unwrap_or(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coople_game::Completion;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn meter_fills_proportionally() {
        let progress = PlaybackProgress {
            position_ms: 1000,
            window_ms: 2000,
        };
        no_color();
        let text = meter(&progress);
        assert!(text.starts_with(&format!("[{}", "=".repeat(15))));
        assert!(text.ends_with("0:01 / 0:02"));
    }

    #[test]
    fn stats_chart_lists_every_bucket() {
        let mut record = StatsRecord::default();
        record.log_completion(Completion::Win, 2);
        record.log_completion(Completion::Lose, 6);
        no_color();
        let text = stats(&record);
        assert!(text.contains("Played: 2  Won: 1  Win %: 50"));
        assert_eq!(text.lines().count(), MAX_GUESSES + 2);
        assert!(text.contains("  X "));
    }

    #[test]
    fn scaled_never_exceeds_width() {
        assert_eq!(scaled(0, 20, 10), 0);
        assert_eq!(scaled(20, 20, 10), 10);
        assert_eq!(scaled(40, 20, 10), 10);
        assert_eq!(scaled(11, 20, 10), 5);
        assert_eq!(scaled(3, 0, 10), 0);
    }
}
