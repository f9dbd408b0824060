//! ASCII maze layouts.
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `%` | wall |
//! | `.` | food |
//! | `P` | agent start |
//! | `G` | ghost start |
//! | ` ` | open floor |
//!
//! The first text line is the top row; `y = 0` is the bottom row.

use std::{collections::BTreeSet, fmt};

use crate::{
    Error, Result,
    types::{Direction, Position},
};

/// A parsed maze: walls, food, and the starting cells of the agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    food: BTreeSet<Position>,
    agent_start: Option<Position>,
    ghost_starts: Vec<Position>,
}

impl Layout {
    /// Parse a layout from its text form.
    ///
    /// Blank leading and trailing lines are ignored; every remaining line
    /// must have the same width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] for ragged rows, unknown glyphs, more
    /// than one agent start, or an empty layout.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .skip_while(|(_, line)| line.trim().is_empty())
            .collect();
        let last = rows
            .iter()
            .rposition(|(_, line)| !line.trim().is_empty())
            .ok_or_else(|| layout_error(1, "layout is empty"))?;
        let rows = &rows[..=last];

        let height = rows.len();
        let width = rows[0].1.chars().count();
        let mut layout = Layout {
            width,
            height,
            walls: vec![false; width * height],
            food: BTreeSet::new(),
            agent_start: None,
            ghost_starts: Vec::new(),
        };

        for (row, (line_number, line)) in rows.iter().enumerate() {
            let line_width = line.chars().count();
            if line_width != width {
                return Err(layout_error(
                    *line_number,
                    format!("expected {width} columns, found {line_width}"),
                ));
            }
            let y = height - 1 - row;
            for (x, glyph) in line.chars().enumerate() {
                let position = Position::new(x, y);
                match glyph {
                    '%' => layout.walls[y * width + x] = true,
                    '.' => {
                        layout.food.insert(position);
                    }
                    'P' => {
                        if layout.agent_start.replace(position).is_some() {
                            return Err(layout_error(
                                *line_number,
                                "more than one agent start",
                            ));
                        }
                    }
                    'G' => layout.ghost_starts.push(position),
                    ' ' => {}
                    other => {
                        return Err(layout_error(
                            *line_number,
                            format!("unknown glyph '{other}'"),
                        ));
                    }
                }
            }
        }
        // Ghosts are listed in agent order: top-to-bottom, then left-to-right.
        layout
            .ghost_starts
            .sort_by(|a, b| b.y.cmp(&a.y).then(a.x.cmp(&b.x)));
        Ok(layout)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `position` is a wall. Cells outside the layout count as walls.
    pub fn is_wall(&self, position: Position) -> bool {
        if position.x >= self.width || position.y >= self.height {
            return true;
        }
        self.walls[position.y * self.width + position.x]
    }

    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    pub fn agent_start(&self) -> Option<Position> {
        self.agent_start
    }

    /// The agent start, or an error naming the missing `P`.
    pub fn require_agent_start(&self) -> Result<Position> {
        self.agent_start
            .ok_or_else(|| layout_error(1, "layout has no agent start 'P'"))
    }

    pub fn ghost_starts(&self) -> &[Position] {
        &self.ghost_starts
    }

    /// Open neighbours of `position` with the direction leading to each,
    /// in [`Direction::CARDINAL`] order.
    pub fn neighbors(&self, position: Position) -> Vec<(Direction, Position)> {
        Direction::CARDINAL
            .iter()
            .filter_map(|&direction| {
                let next = position.step(direction)?;
                (!self.is_wall(next)).then_some((direction, next))
            })
            .collect()
    }

    /// The four inner corners: bottom-left, top-left, bottom-right, top-right.
    pub fn corners(&self) -> [Position; 4] {
        let top = self.height.saturating_sub(2);
        let right = self.width.saturating_sub(2);
        [
            Position::new(1, 1),
            Position::new(1, top),
            Position::new(right, 1),
            Position::new(right, top),
        ]
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let position = Position::new(x, y);
                let glyph = if self.is_wall(position) {
                    '%'
                } else if self.agent_start == Some(position) {
                    'P'
                } else if self.ghost_starts.contains(&position) {
                    'G'
                } else if self.food.contains(&position) {
                    '.'
                } else {
                    ' '
                };
                write!(f, "{glyph}")?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn layout_error(line: usize, message: impl Into<String>) -> Error {
    Error::InvalidLayout {
        line,
        message: message.into(),
    }
}

/// Built-in layouts selectable by name.
pub mod presets {
    /// A 5x5 open room with food in the corners.
    pub const TINY_CORNERS: &str = "\
%%%%%%%
%.   .%
%     %
%  P  %
%     %
%.   .%
%%%%%%%";

    pub const TINY_MAZE: &str = "\
%%%%%%%
%    P%
% %%% %
%  %  %
%%   %%
%. %%%%
%%%%%%%";

    pub const TINY_SEARCH: &str = "\
%%%%%%%%%
%..   ..%
%%%%.%% %
%   P   %
%.%% %%.%
%.%.   .%
%%%%%%%%%";

    pub const SMALL_CLASSIC: &str = "\
%%%%%%%%%%%%%%%%%%%%
%......%G  G%......%
%.%%...%%  %%...%%.%
%.%..........%...%.%
%.%.%%.%%  %%.%%.%.%
%......  P   ......%
%%%%%%%%%%%%%%%%%%%%";

    pub const NAMES: [&str; 4] = ["tinyCorners", "tinyMaze", "tinySearch", "smallClassic"];

    /// Look up a preset by name.
    pub fn by_name(name: &str) -> Option<&'static str> {
        match name {
            "tinyCorners" => Some(TINY_CORNERS),
            "tinyMaze" => Some(TINY_MAZE),
            "tinySearch" => Some(TINY_SEARCH),
            "smallClassic" => Some(SMALL_CLASSIC),
            _ => None,
        }
    }
}
