use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub background: Color,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    /// Secondary text such as card subtitles and disabled controls
    pub muted: Style,
    /// The enabled "next" button
    pub button: Style,
    pub error: Style,
}

/// Built-in palettes selectable from the command line or config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dracula,
    Solarized,
    Gruvbox,
    EverforestLight,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Solarized => solarized_dark(),
            Theme::Gruvbox => gruvbox_theme(),
            Theme::EverforestLight => everforest_light_theme(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" | "solarized_dark" => Ok(Theme::Solarized),
            "gruvbox" => Ok(Theme::Gruvbox),
            "everforest_light" | "everforest" => Ok(Theme::EverforestLight),
            other => Err(format!(
                "unknown theme '{other}' (expected dracula, solarized, gruvbox, everforest_light)"
            )),
        }
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_dark() -> ThemeConfig {
    // Solarized Dark palette
    let base03 = Color::Rgb(0, 43, 54);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let red = Color::Rgb(220, 50, 47);
    let blue = Color::Rgb(38, 139, 210);
    let green = Color::Rgb(133, 153, 0);

    ThemeConfig {
        background: base03,
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base03),
        muted: Style::default().fg(base01).bg(base03),
        button: Style::default()
            .fg(base3)
            .bg(green)
            .add_modifier(Modifier::BOLD),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    // Dracula palette
    let bg = Color::Rgb(40, 42, 54);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let green = Color::Rgb(80, 250, 123);
    let red = Color::Rgb(255, 85, 85);

    ThemeConfig {
        background: bg,
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        muted: Style::default().fg(comment).bg(bg),
        button: Style::default()
            .fg(bg)
            .bg(green)
            .add_modifier(Modifier::BOLD),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    // Gruvbox Dark palette
    let bg0 = Color::Rgb(40, 40, 40);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let green = Color::Rgb(152, 151, 26);
    let orange = Color::Rgb(214, 93, 14);
    let red = Color::Rgb(204, 36, 29);

    ThemeConfig {
        background: bg0,
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(orange),
        title: Style::default().fg(orange).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        muted: Style::default().fg(gray).bg(bg0),
        button: Style::default()
            .fg(bg0)
            .bg(green)
            .add_modifier(Modifier::BOLD),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}

/// Returns a ThemeConfig based on the Everforest Light color palette.
pub fn everforest_light_theme() -> ThemeConfig {
    // Everforest Light palette
    let bg = Color::Rgb(253, 246, 227);
    let bg_view = Color::Rgb(243, 234, 211);
    let fg = Color::Rgb(92, 106, 114);
    let gray = Color::Rgb(147, 159, 149);
    let yellow = Color::Rgb(223, 160, 0);
    let green = Color::Rgb(141, 161, 1);
    let red = Color::Rgb(248, 85, 82);

    ThemeConfig {
        background: bg,
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(yellow),
        title: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg_view),
        muted: Style::default().fg(gray).bg(bg_view),
        button: Style::default()
            .fg(bg)
            .bg(green)
            .add_modifier(Modifier::BOLD),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
    }
}
