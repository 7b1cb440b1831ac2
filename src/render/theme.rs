use ratatui::style::{Color, Modifier, Style};

use crate::core::LetterColor;

/// Immutable style table handed to the renderer at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub green: Style,
    pub yellow: Style,
    pub grey: Style,
    pub blank: Style,
    pub flash: Style,
    pub title: Style,
    pub help: Style,
    pub notice: Style,
    pub post_game: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let tile = Style::default()
            .fg(Color::Rgb(0x00, 0x00, 0x00))
            .bg(Color::Rgb(0xfe, 0xfe, 0xfe))
            .add_modifier(Modifier::BOLD);

        Self {
            green: tile.bg(Color::Rgb(0x04, 0xb5, 0x75)),
            yellow: tile.bg(Color::Rgb(0xbd, 0x80, 0x24)),
            grey: tile.bg(Color::Rgb(0x63, 0x66, 0x64)),
            blank: tile,
            flash: tile.bg(Color::Rgb(0xd6, 0x31, 0x31)),
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help: Style::default().fg(Color::DarkGray),
            notice: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            post_game: Style::default()
                .fg(Color::Rgb(0xfe, 0xfe, 0xfe))
                .bg(Color::Rgb(0x58, 0x56, 0x5e))
                .add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// Style for a board cell or key of the given colour
    #[must_use]
    pub const fn tile(&self, color: LetterColor) -> Style {
        match color {
            LetterColor::Green => self.green,
            LetterColor::Yellow => self.yellow,
            LetterColor::Grey => self.grey,
            LetterColor::Blank => self.blank,
            LetterColor::Flash => self.flash,
        }
    }

    /// Uncoloured theme for terminals without colour support
    #[must_use]
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = plain.add_modifier(Modifier::BOLD);
        Self {
            green: bold.add_modifier(Modifier::REVERSED),
            yellow: bold.add_modifier(Modifier::UNDERLINED),
            grey: plain.add_modifier(Modifier::DIM),
            blank: plain,
            flash: bold.add_modifier(Modifier::SLOW_BLINK),
            title: bold,
            help: plain.add_modifier(Modifier::DIM),
            notice: bold,
            post_game: plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_color_has_a_distinct_tile() {
        let theme = Theme::default();
        let colors = [
            LetterColor::Green,
            LetterColor::Yellow,
            LetterColor::Grey,
            LetterColor::Blank,
            LetterColor::Flash,
        ];
        for (i, &a) in colors.iter().enumerate() {
            for &b in &colors[i + 1..] {
                assert_ne!(theme.tile(a), theme.tile(b), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn monochrome_has_no_colors() {
        let theme = Theme::monochrome();
        assert_eq!(theme.tile(LetterColor::Green).bg, None);
        assert_eq!(theme.tile(LetterColor::Green).fg, None);
    }
}
