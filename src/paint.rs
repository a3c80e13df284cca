//
// paint.rs
// Distributed under terms of the MIT license.
//

use colored::{Color, ColoredString, Colorize};

// Style descriptors are dot-joined words in the chalk-pipe tradition:
// "cyan.underline", "orange.bold", "dim.green.italic", "bgYellow.black",
// "#cccccc". Unknown words are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
}

impl Style {
    pub fn parse(descriptor: &str) -> Self {
        let mut style = Style::default();
        for word in descriptor.split('.') {
            match word {
                "bold" => style.bold = true,
                "dim" => style.dim = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                "strikethrough" => style.strikethrough = true,
                _ => {
                    if let Some(rest) = word.strip_prefix("bg") {
                        if let Some(color) = named_color(&lower_first(rest)) {
                            style.bg = Some(color);
                        }
                    } else if let Some(color) = named_color(word) {
                        style.fg = Some(color);
                    }
                }
            }
        }
        style
    }

    // Layers another descriptor on top, as "<base>.<extra>" would.
    pub fn overlay(&self, extra: &Style) -> Self {
        Style {
            fg: extra.fg.or(self.fg),
            bg: extra.bg.or(self.bg),
            bold: self.bold || extra.bold,
            dim: self.dim || extra.dim,
            italic: self.italic || extra.italic,
            underline: self.underline || extra.underline,
            strikethrough: self.strikethrough || extra.strikethrough,
        }
    }

    pub fn paint(&self, text: &str) -> String {
        let mut out: ColoredString = text.normal();
        if let Some(fg) = self.fg {
            out = out.color(fg);
        }
        if let Some(bg) = self.bg {
            out = out.on_color(bg);
        }
        if self.bold {
            out = out.bold();
        }
        if self.dim {
            out = out.dimmed();
        }
        if self.italic {
            out = out.italic();
        }
        if self.underline {
            out = out.underline();
        }
        if self.strikethrough {
            out = out.strikethrough();
        }
        out.to_string()
    }
}

pub fn paint(descriptor: &str, text: &str) -> String {
    Style::parse(descriptor).paint(text)
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn named_color(word: &str) -> Option<Color> {
    if let Some(hex) = word.strip_prefix('#') {
        return hex_color(hex);
    }
    let color = match word {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "blackBright" => Color::BrightBlack,
        "redBright" => Color::BrightRed,
        "greenBright" => Color::BrightGreen,
        "yellowBright" => Color::BrightYellow,
        "blueBright" => Color::BrightBlue,
        "magentaBright" => Color::BrightMagenta,
        "cyanBright" => Color::BrightCyan,
        "whiteBright" => Color::BrightWhite,
        // css keywords the stock color schemes use
        "orange" => Color::TrueColor { r: 255, g: 165, b: 0 },
        "pink" => Color::TrueColor { r: 255, g: 192, b: 203 },
        "purple" => Color::TrueColor { r: 128, g: 0, b: 128 },
        _ => return None,
    };
    Some(color)
}

fn hex_color(hex: &str) -> Option<Color> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::TrueColor { r, g, b })
}
