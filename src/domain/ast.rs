use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Playbook {
    pub players: Vec<String>,
    pub state: State,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub baller: Option<String>,
    pub positions: BTreeMap<String, Point>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    pub moves: Vec<MoveAction>,
    pub screens: Vec<ScreenAction>,
    pub passes: Vec<PassAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAction {
    pub player: String,
    pub target: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenAction {
    pub player: String,
    pub target: String,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassAction {
    pub from: String,
    pub to: String,
    pub timing: Timing,
}

/// When a pass or screen meets its target relative to the target's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Before,
    After,
    Middle,
    #[default]
    Unspecified,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timing::Before => "before",
            Timing::After => "after",
            Timing::Middle => "middle",
            Timing::Unspecified => "unspecified",
        };
        f.write_str(name)
    }
}
