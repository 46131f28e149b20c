use crate::domain::ast::{Playbook, Point, Timing};
use crate::domain::scene::*;
use std::collections::BTreeMap;

pub struct SceneBuilder;

impl SceneBuilder {
    pub fn build(playbook: &Playbook) -> Scene {
        let start_positions = &playbook.state.positions;
        let mut end_positions = start_positions.clone();
        for mv in &playbook.action.moves {
            end_positions.insert(mv.player.clone(), mv.target);
        }

        let start_of = |id: &str| lookup(start_positions, id);
        let end_of = |id: &str| lookup(&end_positions, id);
        let at_timing = |id: &str, timing: Timing| match timing {
            Timing::Before => start_of(id),
            Timing::Middle => start_of(id).midpoint(end_of(id)),
            Timing::After | Timing::Unspecified => end_of(id),
        };

        let entities = playbook
            .players
            .iter()
            .map(|id| Entity {
                id: id.clone(),
                label: label_for(id),
                start: start_of(id),
                end: end_of(id),
                is_baller: playbook.state.baller.as_deref() == Some(id.as_str()),
            })
            .collect();

        let mut interactions = Vec::new();

        for mv in &playbook.action.moves {
            interactions.push(Interaction::Move(MoveLine {
                player_id: mv.player.clone(),
                from: start_of(&mv.player),
                to: mv.target,
            }));
        }

        // The ball leaves from wherever the passer ends up.
        for pass in &playbook.action.passes {
            interactions.push(Interaction::Pass(PassLine {
                from_id: pass.from.clone(),
                to_id: pass.to.clone(),
                from: end_of(&pass.from),
                to: at_timing(&pass.to, pass.timing),
            }));
        }

        for screen in &playbook.action.screens {
            interactions.push(Interaction::Screen(ScreenLine {
                screener_id: screen.player.clone(),
                target_id: screen.target.clone(),
                from: start_of(&screen.player),
                to: at_timing(&screen.target, screen.timing),
            }));
        }

        Scene {
            entities,
            interactions,
        }
    }
}

fn lookup(positions: &BTreeMap<String, Point>, id: &str) -> Point {
    positions.get(id).copied().unwrap_or(Point::ORIGIN)
}

/// `p7` is drawn as `7`; any other name is drawn as-is.
fn label_for(id: &str) -> String {
    match id.strip_prefix('p') {
        Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) => {
            rest.to_string()
        }
        _ => id.to_string(),
    }
}
