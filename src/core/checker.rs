use crate::domain::ast::Playbook;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Reports references the scene builder will silently resolve to the origin,
/// plus a few plays that are legal syntax but almost certainly typos.
pub fn check(playbook: &Playbook) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut report = |message: String| diagnostics.push(Diagnostic { message });

    let mut seen = HashSet::new();
    for player in &playbook.players {
        if !seen.insert(player.as_str()) {
            report(format!("player '{}' is declared more than once", player));
        }
    }

    let undeclared = |name: &str| !seen.contains(name);

    if let Some(baller) = &playbook.state.baller {
        if undeclared(baller) {
            report(format!("baller '{}' is not declared in players", baller));
        }
    }

    for player in playbook.state.positions.keys() {
        if undeclared(player) {
            report(format!("position given for undeclared player '{}'", player));
        }
    }

    for player in &playbook.players {
        if !playbook.state.positions.contains_key(player) {
            report(format!("player '{}' has no position and is drawn at (0, 0)", player));
        }
    }

    for mv in &playbook.action.moves {
        if undeclared(&mv.player) {
            report(format!("move references undeclared player '{}'", mv.player));
        }
    }

    for screen in &playbook.action.screens {
        for name in [&screen.player, &screen.target] {
            if undeclared(name) {
                report(format!("screen references undeclared player '{}'", name));
            }
        }
        if screen.player == screen.target {
            report(format!("player '{}' screens themselves", screen.player));
        }
    }

    for pass in &playbook.action.passes {
        for name in [&pass.from, &pass.to] {
            if undeclared(name) {
                report(format!("pass references undeclared player '{}'", name));
            }
        }
        if pass.from == pass.to {
            report(format!("player '{}' passes to themselves", pass.from));
        }
    }

    diagnostics
}
