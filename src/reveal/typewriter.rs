//! Character-by-character text reveal

use crate::render::AssetId;

/// Delay between characters of a line
pub const CHAR_DELAY: f32 = 0.032;
/// Pause after each line break
pub const LINE_PAUSE: f32 = 0.35;

/// Reveals text one character at a time, pausing between lines
///
/// Each line ends with a newline in the visible text. The first character
/// of a line shows as soon as its turn comes.
#[derive(Debug, Clone)]
pub struct Typewriter {
    image: AssetId,
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
    shown: String,
    clock: f64,
    next_at: f64,
}

impl Typewriter {
    /// Reveal `text` over the `image` backdrop
    pub fn new(text: &str, image: AssetId) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).chars().collect())
            .collect();
        Self {
            image,
            lines,
            line: 0,
            column: 0,
            shown: String::new(),
            clock: 0.0,
            next_at: 0.0,
        }
    }

    /// Advance by `dt` seconds, emitting every character that has come due
    pub fn tick(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += f64::from(dt);
        }
        while !self.is_done() && self.next_at <= self.clock {
            self.step();
        }
    }

    fn step(&mut self) {
        let Some(line) = self.lines.get(self.line) else {
            return;
        };
        if let Some(&ch) = line.get(self.column) {
            self.shown.push(ch);
            self.column += 1;
            self.next_at += f64::from(CHAR_DELAY);
        } else {
            self.shown.push('\n');
            self.line += 1;
            self.column = 0;
            self.next_at += f64::from(LINE_PAUSE);
        }
    }

    pub fn image(&self) -> AssetId {
        self.image
    }

    pub fn visible_text(&self) -> &str {
        &self.shown
    }

    pub fn is_done(&self) -> bool {
        self.line >= self.lines.len()
    }

    /// Seconds from the first character until the last line break
    pub fn total_duration(&self) -> f32 {
        let chars: usize = self.lines.iter().map(Vec::len).sum();
        chars as f32 * CHAR_DELAY + self.lines.len().saturating_sub(1) as f32 * LINE_PAUSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing() {
        let mut writer = Typewriter::new("ab\r\ncd", AssetId::LetterBox);
        writer.tick(0.0);
        assert_eq!(writer.visible_text(), "a");
        writer.tick(0.04);
        assert_eq!(writer.visible_text(), "ab");
        writer.tick(0.03);
        assert_eq!(writer.visible_text(), "ab\n");

        // still pausing between lines
        writer.tick(0.3);
        assert_eq!(writer.visible_text(), "ab\n");
        writer.tick(0.05);
        assert_eq!(writer.visible_text(), "ab\nc");
        assert!(!writer.is_done());

        writer.tick(1.0);
        assert_eq!(writer.visible_text(), "ab\ncd\n");
        assert!(writer.is_done());
    }

    #[test]
    fn test_large_step_catches_up() {
        let text = "hello\nworld";
        let mut writer = Typewriter::new(text, AssetId::LetterBox);
        writer.tick(writer.total_duration() + 0.1);
        assert!(writer.is_done());
        assert_eq!(writer.visible_text(), "hello\nworld\n");
    }

    #[test]
    fn test_empty_text() {
        let mut writer = Typewriter::new("", AssetId::Placeholder);
        writer.tick(0.1);
        assert_eq!(writer.visible_text(), "\n");
        assert_eq!(writer.image(), AssetId::Placeholder);
        assert!(writer.is_done());
    }
}
