use catppuccin::PALETTE;
use ratatui::style::Color;

const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used across the UI.
///
/// Built from a Catppuccin flavor; see [`theme_from_name`].
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    base: Color,
    surface0: Color,
    surface1: Color,
    surface2: Color,
    overlay0: Color,
    overlay1: Color,
    text: Color,
    subtext0: Color,
    subtext1: Color,
    mauve: Color,
    red: Color,
    peach: Color,
    yellow: Color,
    green: Color,
    blue: Color,
    lavender: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            subtext1: catppuccin_to_color(&c.subtext1),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    pub const fn base(&self) -> Color {
        self.base
    }

    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    pub const fn surface1(&self) -> Color {
        self.surface1
    }

    pub const fn surface2(&self) -> Color {
        self.surface2
    }

    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    pub const fn text(&self) -> Color {
        self.text
    }

    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    pub const fn subtext1(&self) -> Color {
        self.subtext1
    }

    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    pub const fn red(&self) -> Color {
        self.red
    }

    pub const fn peach(&self) -> Color {
        self.peach
    }

    pub const fn yellow(&self) -> Color {
        self.yellow
    }

    pub const fn green(&self) -> Color {
        self.green
    }

    pub const fn blue(&self) -> Color {
        self.blue
    }

    pub const fn lavender(&self) -> Color {
        self.lavender
    }

    /// Background of the selected table row.
    pub const fn selection_bg(&self) -> Color {
        self.surface0
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Look up a theme by its display name, falling back to Mocha.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Latte" => Theme::catppuccin_latte(),
        "Catppuccin Frappé" | "Catppuccin Frappe" => Theme::catppuccin_frappe(),
        "Catppuccin Macchiato" => Theme::catppuccin_macchiato(),
        "Catppuccin Mocha" => Theme::catppuccin_mocha(),
        other => {
            tracing::warn!(theme = other, "Unknown theme, using Catppuccin Mocha");
            Theme::catppuccin_mocha()
        }
    }
}
