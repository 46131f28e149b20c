use crate::domain::scene::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Canvas and style knobs. The defaults reproduce the classic 500px court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Court spans `-half_extent..=half_extent` on both axes.
    pub half_extent: f64,
    /// Extra room around the court so markers on the edge are not clipped.
    pub padding: f64,
    pub court_stroke: String,
    pub move_color: String,
    pub pass_color: String,
    pub screen_color: String,
    pub ball_color: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            half_extent: 100.0,
            padding: 5.0,
            court_stroke: "#ccc".to_string(),
            move_color: "black".to_string(),
            pass_color: "black".to_string(),
            screen_color: "blue".to_string(),
            ball_color: "orange".to_string(),
        }
    }
}

const MOVE_MARKER: &str = "arrowhead";
const PASS_MARKER: &str = "arrowhead-pass";

fn write_marker(svg: &mut String, id: &str, fill: &str) {
    let _ = write!(
        svg,
        "<marker id=\"{}\" markerWidth=\"10\" markerHeight=\"7\" refX=\"10\" refY=\"3.5\" orient=\"auto\"><polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{}\" /></marker>",
        id, fill
    );
}

#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    settings: RenderSettings,
}

impl SvgRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn render_scene(&self, scene: &Scene) -> String {
        let s = &self.settings;
        let view_min = -(s.half_extent + s.padding);
        let view_size = 2.0 * (s.half_extent + s.padding);
        let court_size = 2.0 * s.half_extent;

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" xmlns=\"http://www.w3.org/2000/svg\">",
            s.width, s.height, view_min, view_min, view_size, view_size
        );
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" />",
            -s.half_extent, -s.half_extent, court_size, court_size, s.court_stroke
        );

        for interaction in &scene.interactions {
            match interaction {
                Interaction::Move(m) => self.render_move(&mut svg, m),
                Interaction::Pass(p) => self.render_pass(&mut svg, p),
                Interaction::Screen(sc) => self.render_screen(&mut svg, sc),
            }
        }

        // Players go last so they sit on top of the lines.
        for entity in &scene.entities {
            self.render_player(&mut svg, entity);
        }

        svg.push_str("<defs>");
        write_marker(&mut svg, MOVE_MARKER, &s.move_color);
        if self.pass_marker() != MOVE_MARKER {
            write_marker(&mut svg, PASS_MARKER, &s.pass_color);
        }
        svg.push_str("</defs></svg>");
        svg
    }

    /// Passes share the move arrowhead unless they are drawn in another color.
    fn pass_marker(&self) -> &'static str {
        if self.settings.pass_color == self.settings.move_color {
            MOVE_MARKER
        } else {
            PASS_MARKER
        }
    }

    fn render_move(&self, svg: &mut String, m: &MoveLine) {
        let _ = write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#{})\" />",
            m.from.x, m.from.y, m.to.x, m.to.y, self.settings.move_color, MOVE_MARKER
        );
    }

    fn render_pass(&self, svg: &mut String, p: &PassLine) {
        let _ = write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"4\" marker-end=\"url(#{})\" />",
            p.from.x, p.from.y, p.to.x, p.to.y, self.settings.pass_color, self.pass_marker()
        );
    }

    fn render_screen(&self, svg: &mut String, s: &ScreenLine) {
        let _ = write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"4\" />",
            s.from.x, s.from.y, s.to.x, s.to.y, self.settings.screen_color
        );
    }

    fn render_player(&self, svg: &mut String, entity: &Entity) {
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"8\" fill=\"white\" stroke=\"gray\" stroke-width=\"1\" opacity=\"0.3\" />",
            entity.start.x, entity.start.y
        );
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"10\" fill=\"white\" stroke=\"black\" stroke-width=\"2\" />",
            entity.end.x, entity.end.y
        );
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"Arial\">{}</text>",
            entity.end.x, entity.end.y, entity.label
        );

        if entity.is_baller {
            let _ = write!(
                svg,
                "<circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"{}\" stroke=\"black\" stroke-width=\"1\" transform=\"translate(10, -10)\" />",
                entity.end.x, entity.end.y, self.settings.ball_color
            );
        }
    }
}
