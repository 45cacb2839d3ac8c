// core/state.rs

// Derived robot state: which game pieces are held and which alliance the robot
// is committed to. Both are recomputed from raw readings; neither keeps history.

use serde::{Deserialize, Serialize};

// Game pieces currently held by the robot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HeldObject {
    #[default]
    None,
    Coral,
    Algae,
    Both,
}

impl HeldObject {
    /// Classifies the two piece sensors; total over all four combinations
    pub fn classify(has_coral: bool, has_algae: bool) -> Self {
        match (has_coral, has_algae) {
            (false, false) => HeldObject::None,
            (true, false) => HeldObject::Coral,
            (false, true) => HeldObject::Algae,
            (true, true) => HeldObject::Both,
        }
    }

    pub fn has_coral(self) -> bool {
        matches!(self, HeldObject::Coral | HeldObject::Both)
    }

    pub fn has_algae(self) -> bool {
        matches!(self, HeldObject::Algae | HeldObject::Both)
    }
}

impl std::fmt::Display for HeldObject {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            HeldObject::None => "None",
            HeldObject::Coral => "Coral",
            HeldObject::Algae => "Algae",
            HeldObject::Both => "Both",
        };
        f.write_str(name)
    }
}

// Field side assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Alliance {
    #[default]
    Blue,
    Red,
}

impl Alliance {
    /// Resolves a driver station reading; an unassigned alliance counts as Blue
    pub fn resolve(reported: Option<Alliance>) -> Self {
        reported.unwrap_or(Alliance::Blue)
    }
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Alliance::Blue => f.write_str("Blue"),
            Alliance::Red => f.write_str("Red"),
        }
    }
}
