/// Page copy scrolled over the rendered model
use crossterm::{
    cursor,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use showcase_core::{Rgb, ScrollState};
use std::io::Write;

use crate::renderer::to_terminal_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One viewport-tall block of copy
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub heading: &'static str,
    /// Second heading line, drawn dimmer when `muted_subheading` is set
    pub subheading: &'static str,
    pub muted_subheading: bool,
    pub body: &'static str,
    pub call_to_action: Option<&'static str>,
    pub align: Align,
}

pub const SECTIONS: [Section; 4] = [
    Section {
        heading: "TERMINAL",
        subheading: "LOGISTICS",
        muted_subheading: true,
        body: "Don't overdo it. Keep it simple.",
        call_to_action: None,
        align: Align::Left,
    },
    Section {
        heading: "INTELLIGENT",
        subheading: "INFRASTRUCTURE",
        muted_subheading: false,
        body: "Connecting the yard to the highway.",
        call_to_action: None,
        align: Align::Right,
    },
    Section {
        heading: "THE MATRIX",
        subheading: "VIEW",
        muted_subheading: false,
        body: "Switching to digital twin mode.",
        call_to_action: None,
        align: Align::Left,
    },
    Section {
        heading: "READY TO",
        subheading: "DEPLOY?",
        muted_subheading: false,
        body: "",
        call_to_action: Some("[ GET STARTED ]"),
        align: Align::Right,
    },
];

const MARGIN: i32 = 4;
const MUTED: Rgb = Rgb(0x55, 0x55, 0x55);
const TEXT: Rgb = Rgb(0xf0, 0xf0, 0xf0);

/// A positioned run of text
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub x: u16,
    pub y: u16,
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
}

pub struct Overlay {
    sections: &'static [Section],
}

impl Overlay {
    pub fn new(sections: &'static [Section]) -> Self {
        Self { sections }
    }

    /// Index of the section covering the current offset
    pub fn current_section(&self, scroll: &ScrollState) -> Option<usize> {
        let span = 1.0 / self.sections.len() as f64;
        (0..self.sections.len()).find(|&i| scroll.visible(i as f64 * span, span, 0.0))
    }

    /// Lay out every on-screen line.
    ///
    /// Sections are stacked one viewport apart and move up as the page
    /// scrolls; text dims as its section leaves the middle of the screen.
    pub fn layout(&self, scroll: &ScrollState, width: u16, height: u16) -> Vec<OverlayLine> {
        let h = height as f64;
        let travel = scroll.offset() * (scroll.pages - 1.0).max(0.0);
        // Progress covered by scrolling one viewport
        let step = 1.0 / (scroll.pages - 1.0).max(f64::EPSILON);
        let mut lines = Vec::new();

        for (index, section) in self.sections.iter().enumerate() {
            let top = (index as f64 - travel) * h;
            if top + h <= 0.0 || top >= h {
                continue;
            }
            // 1.0 when the section fills the screen, 0.0 a viewport away
            let presence = scroll.curve((index as f64 - 1.0) * step, 2.0 * step, 0.0) as f32;
            let fade = |color: Rgb| color.scaled(0.3 + 0.7 * presence);

            let mut rows = vec![
                (section.heading, fade(TEXT), true),
                (
                    section.subheading,
                    fade(if section.muted_subheading { MUTED } else { TEXT }),
                    true,
                ),
            ];
            if !section.body.is_empty() {
                rows.push(("", TEXT, false));
                rows.push((section.body, fade(TEXT), false));
            }
            if let Some(cta) = section.call_to_action {
                rows.push(("", TEXT, false));
                rows.push((cta, fade(TEXT), true));
            }

            let first_row = top.round() as i32 + (height as i32 - rows.len() as i32) / 2;
            for (offset, (text, color, bold)) in rows.into_iter().enumerate() {
                let y = first_row + offset as i32;
                if text.is_empty() || y < 1 || y >= height as i32 {
                    continue;
                }
                let x = match section.align {
                    Align::Left => MARGIN,
                    Align::Right => width as i32 - MARGIN - text.chars().count() as i32,
                };
                lines.push(OverlayLine {
                    x: x.max(0) as u16,
                    y: y as u16,
                    text: text.to_string(),
                    color,
                    bold,
                });
            }
        }
        lines
    }

    pub fn draw<W: Write>(&self, writer: &mut W, lines: &[OverlayLine]) -> std::io::Result<()> {
        for line in lines {
            writer.queue(cursor::MoveTo(line.x, line.y))?;
            writer.queue(SetForegroundColor(to_terminal_color(line.color)))?;
            if line.bold {
                writer.queue(SetAttribute(Attribute::Bold))?;
            }
            writer.queue(Print(&line.text))?;
            writer.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(&SECTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scrolled(progress: f64) -> ScrollState {
        let mut scroll = ScrollState::new(4.0, 0.0);
        scroll.scroll_to(progress);
        scroll.update(Duration::ZERO);
        scroll
    }

    fn texts(lines: &[OverlayLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_top_of_page_shows_first_section() {
        let lines = Overlay::default().layout(&scrolled(0.0), 80, 24);
        assert_eq!(
            texts(&lines),
            vec!["TERMINAL", "LOGISTICS", "Don't overdo it. Keep it simple."]
        );
        assert!(lines.iter().all(|l| l.x == 4));
        assert_eq!(lines[1].color, MUTED);
    }

    #[test]
    fn test_bottom_of_page_shows_call_to_action_on_the_right() {
        let lines = Overlay::default().layout(&scrolled(1.0), 80, 24);
        assert_eq!(texts(&lines), vec!["READY TO", "DEPLOY?", "[ GET STARTED ]"]);
        let cta = &lines[2];
        assert_eq!(cta.x as usize + cta.text.len(), 76);
    }

    #[test]
    fn test_sections_scroll_between_viewports() {
        // Half way between the first and second section both are partly visible
        let lines = Overlay::default().layout(&scrolled(1.0 / 6.0), 80, 24);
        let text = texts(&lines);
        assert!(text.contains(&"Don't overdo it. Keep it simple."));
        assert!(text.contains(&"INTELLIGENT"));
        assert!(lines.iter().all(|l| l.y >= 1 && l.y < 24));
    }

    #[test]
    fn test_sections_fade_between_viewports() {
        let overlay = Overlay::default();
        let centered = overlay.layout(&scrolled(1.0 / 3.0), 80, 24);
        assert_eq!(centered[0].text, "INTELLIGENT");
        assert_eq!(centered[0].color, TEXT);

        // Half a viewport past the second section, both neighbours are dimmed alike
        let between = overlay.layout(&scrolled(0.5), 80, 24);
        let dimmed = TEXT.scaled(0.3 + 0.7 * std::f32::consts::FRAC_1_SQRT_2);
        let leaving = between
            .iter()
            .find(|l| l.text == "Connecting the yard to the highway.")
            .unwrap();
        let arriving = between.iter().find(|l| l.text == "THE MATRIX").unwrap();
        assert_eq!(leaving.color, dimmed);
        assert_eq!(arriving.color, dimmed);
    }

    #[test]
    fn test_current_section() {
        let overlay = Overlay::default();
        assert_eq!(overlay.current_section(&scrolled(0.1)), Some(0));
        assert_eq!(overlay.current_section(&scrolled(0.6)), Some(2));
        assert_eq!(overlay.current_section(&scrolled(1.0)), Some(3));
    }
}
