//! Score tallying and the append-only score log.
//!
//! The log is plain text, one integer percentage per line, UTF-8, no header.
//! It is shared between sessions (and processes) with no locking discipline;
//! interleaved appends are an accepted limitation.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{instrument, warn};

/// Count positions where the recorded answer equals the correct one
/// (exact, case-sensitive match). Unanswered questions never match.
pub fn compute_score(user_answers: &[Option<String>], answers: &[String]) -> usize {
  user_answers
    .iter()
    .zip(answers)
    .filter(|(got, want)| got.as_deref() == Some(want.as_str()))
    .count()
}

/// Percentage of correct answers, truncated toward zero (2/3 -> 66, not 67).
pub fn percentage(score: usize, total: usize) -> u64 {
  if total == 0 {
    return 0;
  }
  (score as u64 * 100) / total as u64
}

/// Append one percentage line to the log, creating the file if absent.
/// If the very first append fails because the file is missing, recover by
/// writing a fresh log with a single `0` entry before appending.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn append_score(path: impl AsRef<Path>, pct: u64) -> Result<(), String> {
  let path = path.as_ref();
  let append = |p: &Path| -> std::io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(p)?;
    writeln!(f, "{}", pct)
  };
  match append(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      // Parent missing or file vanished: bootstrap with a 0 entry.
      warn!(target: "quiz", path = %path.display(), "Score log missing; bootstrapping");
      let mut f = File::create(path).map_err(|e| e.to_string())?;
      writeln!(f, "0").map_err(|e| e.to_string())?;
      append(path).map_err(|e| e.to_string())
    }
    Err(e) => Err(e.to_string()),
  }
}

/// Read the whole log and return the maximum of all lines that parse as a
/// non-negative integer. Malformed lines are skipped silently; an empty or
/// missing log yields None.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn high_score(path: impl AsRef<Path>) -> Result<Option<u64>, String> {
  let file = match File::open(path.as_ref()) {
    Ok(f) => f,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(e.to_string()),
  };
  let mut best: Option<u64> = None;
  for line in BufReader::new(file).lines() {
    let line = line.map_err(|e| e.to_string())?;
    if let Ok(v) = line.trim().parse::<u64>() {
      best = Some(best.map_or(v, |b| b.max(v)));
    }
  }
  Ok(best)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn temp_log() -> PathBuf {
    std::env::temp_dir().join(format!("scorer-test-{}.txt", uuid::Uuid::new_v4()))
  }

  fn opt(items: &[&str]) -> Vec<Option<String>> {
    items.iter().map(|s| Some(s.to_string())).collect()
  }

  fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn score_counts_exact_matches() {
    let user = opt(&["A", "B", "C"]);
    let correct = owned(&["A", "X", "C"]);
    assert_eq!(compute_score(&user, &correct), 2);
  }

  #[test]
  fn score_is_case_sensitive_and_skips_unanswered() {
    let user = vec![Some("a".to_string()), None, Some("C".to_string())];
    let correct = owned(&["A", "B", "C"]);
    assert_eq!(compute_score(&user, &correct), 1);
  }

  #[test]
  fn percentage_truncates() {
    assert_eq!(percentage(2, 3), 66);
    assert_eq!(percentage(1, 3), 33);
    assert_eq!(percentage(3, 3), 100);
    assert_eq!(percentage(0, 5), 0);
    assert_eq!(percentage(0, 0), 0);
  }

  #[test]
  fn high_score_skips_malformed_lines() {
    let path = temp_log();
    std::fs::write(&path, "50\n80\nnot-a-number\n30\n").unwrap();
    assert_eq!(high_score(&path).unwrap(), Some(80));
    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn high_score_missing_file_is_none() {
    assert_eq!(high_score(temp_log()).unwrap(), None);
  }

  #[test]
  fn append_creates_and_accumulates() {
    let path = temp_log();
    append_score(&path, 66).unwrap();
    append_score(&path, 40).unwrap();
    let body = std::fs::read_to_string(&path).unwrap();
    assert_eq!(body, "66\n40\n");
    assert_eq!(high_score(&path).unwrap(), Some(66));
    std::fs::remove_file(&path).ok();
  }
}
