//! Loads level blueprints authored as TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use survivor_core::{LevelBlueprint, LoadedLevel};

/// Reads, parses, and validates the level stored at `path`.
pub(crate) fn load_level(path: impl AsRef<Path>) -> Result<LoadedLevel> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    parse_level(&contents).with_context(|| format!("invalid level file {}", path.display()))
}

fn parse_level(contents: &str) -> Result<LoadedLevel> {
    let blueprint: LevelBlueprint =
        toml::from_str(contents).context("failed to parse level toml contents")?;
    let name = blueprint.name.clone();
    blueprint
        .load()
        .with_context(|| format!("level `{name}` failed validation"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const GRAVEYARD: &str = include_str!("../../../levels/graveyard.toml");

    #[test]
    fn shipped_level_loads() {
        let level = parse_level(GRAVEYARD).expect("graveyard level should load");

        assert_eq!(level.name(), "Graveyard");
        assert_eq!(level.level_duration(), Duration::from_secs(600));
        assert_eq!(level.chest_period(), Duration::from_secs(45));
        assert_eq!(level.scripted_events().len(), 3);
        let finals = level
            .scripted_events()
            .iter()
            .filter(|event| event.final_boss)
            .count();
        assert_eq!(finals, 1);
    }

    #[test]
    fn unknown_monster_reference_is_rejected() {
        let broken = GRAVEYARD.replace(
            "monster = { pool = 1, variant = 1 }",
            "monster = { pool = 7, variant = 1 }",
        );

        let error = parse_level(&broken).expect_err("pool 7 does not exist");
        let message = format!("{error:#}");
        assert!(message.contains("monster pool 7 does not exist"), "{message}");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let result = parse_level("name = ");
        assert!(result.is_err(), "truncated file must not parse");
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("missing.toml");

        let error = load_level(&path).expect_err("file does not exist");
        assert!(format!("{error}").contains("missing.toml"));
    }
}
