use std::collections::HashMap;

use serde::Deserialize;

/// The published team to source-package mapping, keyed by team name.
#[derive(Deserialize, Debug, Clone)]
pub struct PackageTeams(HashMap<String, Vec<String>>);

impl PackageTeams {
    pub fn packages_for(&self, team: &str) -> &[String] {
        self.0.get(team).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Outcome of one package rebuild attempt.
///
/// The "source unavailable" case is kept out-of-band instead of being folded
/// into the exit-status space; it only becomes `-1` when rendered into a
/// `.result` artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    SourceUnavailable,
    Completed(i32),
}

impl BuildOutcome {
    /// Integer written to the `.result` artifact for this outcome.
    pub fn result_code(&self) -> i64 {
        match self {
            BuildOutcome::SourceUnavailable => -1,
            BuildOutcome::Completed(code) => *code as i64,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Completed(0))
    }

    /// Human-readable description, following timeout(1) exit conventions.
    pub fn describe(&self) -> String {
        match self {
            BuildOutcome::SourceUnavailable => "source unavailable for this release".to_string(),
            BuildOutcome::Completed(0) => "built".to_string(),
            BuildOutcome::Completed(124) => "build timed out".to_string(),
            BuildOutcome::Completed(125) => "timeout mechanism failed".to_string(),
            BuildOutcome::Completed(126) => "build command could not be invoked".to_string(),
            BuildOutcome::Completed(127) => "build command not found".to_string(),
            BuildOutcome::Completed(137) => "build forcibly killed".to_string(),
            BuildOutcome::Completed(code) => format!("build failed with status {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{BuildOutcome, PackageTeams};

    #[test]
    fn package_teams_lookup_preserves_order() {
        let teams: PackageTeams = serde_json::from_str(
            r#"{"foundations-bugs": ["bash", "coreutils", "dpkg"], "kernel": ["linux"]}"#,
        )
        .unwrap();

        assert_eq!(
            teams.packages_for("foundations-bugs"),
            ["bash", "coreutils", "dpkg"]
        );
        assert_eq!(teams.packages_for("kernel"), ["linux"]);
    }

    #[test]
    fn package_teams_lookup_absent_team_is_empty() {
        let teams: PackageTeams = serde_json::from_str(r#"{"kernel": ["linux"]}"#).unwrap();

        assert!(teams.packages_for("no-such-team").is_empty());
    }

    #[test]
    fn package_teams_rejects_malformed_document() {
        assert!(serde_json::from_str::<PackageTeams>(r#"["not", "a", "mapping"]"#).is_err());
        assert!(serde_json::from_str::<PackageTeams>("{").is_err());
    }

    #[test]
    fn result_code_rendering() {
        assert_eq!(BuildOutcome::SourceUnavailable.result_code(), -1);
        assert_eq!(BuildOutcome::Completed(0).result_code(), 0);
        assert_eq!(BuildOutcome::Completed(124).result_code(), 124);
    }

    #[test]
    fn outcome_descriptions_follow_timeout_conventions() {
        assert_eq!(BuildOutcome::Completed(0).describe(), "built");
        assert_eq!(BuildOutcome::Completed(124).describe(), "build timed out");
        assert_eq!(
            BuildOutcome::Completed(125).describe(),
            "timeout mechanism failed"
        );
        assert_eq!(
            BuildOutcome::Completed(126).describe(),
            "build command could not be invoked"
        );
        assert_eq!(
            BuildOutcome::Completed(127).describe(),
            "build command not found"
        );
        assert_eq!(
            BuildOutcome::Completed(137).describe(),
            "build forcibly killed"
        );
        assert_eq!(
            BuildOutcome::Completed(2).describe(),
            "build failed with status 2"
        );
    }

    #[test]
    fn only_zero_is_success() {
        assert!(BuildOutcome::Completed(0).is_success());
        assert!(!BuildOutcome::Completed(1).is_success());
        assert!(!BuildOutcome::SourceUnavailable.is_success());
    }
}
