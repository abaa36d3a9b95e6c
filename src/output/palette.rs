//! Styles for human-mode output.

use console::Style;

/// Centralizes colors so every command renders the same way.
pub struct Palette {
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub kind: Style,
    pub path: Style,
}

impl Palette {
    /// Build the palette; with `color` off every style renders plain text.
    pub fn new(color: bool) -> Self {
        let style = |s: Style| s.force_styling(color);
        Self {
            accent: style(Style::new().cyan()),
            success: style(Style::new().green().bold()),
            error: style(Style::new().red().bold()),
            warning: style(Style::new().yellow().bold()),
            muted: style(Style::new().dim()),
            header: style(Style::new().cyan().bold()),
            label: style(Style::new().dim()),
            value: style(Style::new().bold()),
            kind: style(Style::new().magenta()),
            path: style(Style::new().italic()),
        }
    }
}
