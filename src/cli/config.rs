//! Shared configuration and input loading for CLI commands

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::{
    config::GridmindConfig,
    grid::{Layout, presets},
    types::Position,
};

/// Load the `--config` file, or the defaults when none was given.
pub fn load_config(path: Option<&Path>) -> Result<GridmindConfig> {
    match path {
        Some(path) => GridmindConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GridmindConfig::default()),
    }
}

/// Parse a layout given either as a preset name or as a file path.
pub fn load_layout(source: &str) -> Result<Layout> {
    if let Some(text) = presets::by_name(source) {
        return Ok(Layout::parse(text)?);
    }
    let path = Path::new(source);
    if !path.exists() {
        bail!(
            "'{source}' is neither a layout file nor a preset (presets: {})",
            presets::NAMES.join(", ")
        );
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    Layout::parse(&text).with_context(|| format!("invalid layout {}", path.display()))
}

/// Parse a cell written as `x,y`.
pub fn parse_position(value: &str) -> Result<Position> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected a position as `x,y`, got '{value}'"))?;
    let x = x.trim().parse().context("invalid x coordinate")?;
    let y = y.trim().parse().context("invalid y coordinate")?;
    Ok(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_load_by_name() {
        let layout = load_layout("tinyMaze").unwrap();
        assert!(layout.agent_start().is_some());
    }

    #[test]
    fn layouts_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.lay");
        std::fs::write(&path, "%%%%\n%P.%\n%%%%\n").unwrap();
        let layout = load_layout(path.to_str().unwrap()).unwrap();
        assert_eq!(layout.width(), 4);
        assert_eq!(layout.food().len(), 1);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let err = load_layout("no-such-layout").unwrap_err();
        assert!(err.to_string().contains("tinyCorners"));
    }

    #[test]
    fn positions_parse() {
        assert_eq!(parse_position("3, 4").unwrap(), Position::new(3, 4));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a,1").is_err());
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), GridmindConfig::default());
    }
}
