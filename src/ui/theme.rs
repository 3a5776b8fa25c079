use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    Auto,
    Truecolor,
    Color256,
    Mono,
}

impl ColorSupport {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "truecolor" | "24bit" => ColorSupport::Truecolor,
            "256" | "256color" => ColorSupport::Color256,
            "mono" | "monochrome" => ColorSupport::Mono,
            _ => ColorSupport::Auto,
        }
    }
}

pub fn detect_color_support() -> ColorSupport {
    support_from_env(
        &std::env::var("COLORTERM").unwrap_or_default(),
        &std::env::var("TERM").unwrap_or_default(),
    )
}

fn support_from_env(colorterm: &str, term: &str) -> ColorSupport {
    let colorterm = colorterm.to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorSupport::Truecolor;
    }
    let term = term.to_lowercase();
    if term.contains("256color") {
        return ColorSupport::Color256;
    }
    if term.is_empty() || term == "dumb" || term == "linux" {
        return ColorSupport::Mono;
    }
    ColorSupport::Color256
}

pub fn resolve_color_support(config: &str) -> ColorSupport {
    let parsed = ColorSupport::from_config_str(config);
    if parsed == ColorSupport::Auto {
        detect_color_support()
    } else {
        parsed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub kind: ThemeKind,
    pub surface_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub header_accent_fg: Color,
    pub header_accent_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub sparkline_color: Color,
    pub table_header_fg: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
    pub statusbar_bg: Color,
    pub pill_key_fg: Color,
    pub pill_key_bg: Color,
    pub pill_desc_fg: Color,
    pub accent: Color,
}

impl Theme {
    pub fn from_config(name: &str, support: ColorSupport) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(support),
            _ => Self::dark(support),
        }
    }

    pub fn next(&self, support: ColorSupport) -> Self {
        match self.kind {
            ThemeKind::Dark => Self::light(support),
            ThemeKind::Light => Self::dark(support),
        }
    }

    fn dark(support: ColorSupport) -> Self {
        let pick = |rgb, indexed| pick_color(support, rgb, indexed);
        Theme {
            kind: ThemeKind::Dark,
            surface_bg: pick(Color::Rgb(30, 30, 46), Color::Indexed(235)),
            overlay_border: pick(Color::Rgb(88, 91, 112), Color::Indexed(240)),
            text_primary: pick(Color::Rgb(205, 214, 244), Color::Indexed(253)),
            text_secondary: pick(Color::Rgb(147, 153, 178), Color::Indexed(245)),
            header_accent_fg: pick(Color::Rgb(30, 30, 46), Color::Indexed(235)),
            header_accent_bg: pick(Color::Rgb(137, 180, 250), Color::Indexed(111)),
            gauge_filled: pick(Color::Rgb(166, 227, 161), Color::Indexed(114)),
            gauge_unfilled: pick(Color::Rgb(49, 50, 68), Color::Indexed(237)),
            sparkline_color: pick(Color::Rgb(250, 179, 135), Color::Indexed(216)),
            table_header_fg: pick(Color::Rgb(203, 166, 247), Color::Indexed(183)),
            selection_fg: pick(Color::Rgb(30, 30, 46), Color::Indexed(235)),
            selection_bg: pick(Color::Rgb(137, 180, 250), Color::Indexed(111)),
            statusbar_bg: pick(Color::Rgb(24, 24, 37), Color::Indexed(234)),
            pill_key_fg: pick(Color::Rgb(30, 30, 46), Color::Indexed(235)),
            pill_key_bg: pick(Color::Rgb(148, 226, 213), Color::Indexed(116)),
            pill_desc_fg: pick(Color::Rgb(166, 173, 200), Color::Indexed(146)),
            accent: pick(Color::Rgb(203, 166, 247), Color::Indexed(183)),
        }
    }

    fn light(support: ColorSupport) -> Self {
        let pick = |rgb, indexed| pick_color(support, rgb, indexed);
        Theme {
            kind: ThemeKind::Light,
            surface_bg: pick(Color::Rgb(239, 241, 245), Color::Indexed(255)),
            overlay_border: pick(Color::Rgb(156, 160, 176), Color::Indexed(247)),
            text_primary: pick(Color::Rgb(76, 79, 105), Color::Indexed(239)),
            text_secondary: pick(Color::Rgb(108, 111, 133), Color::Indexed(243)),
            header_accent_fg: pick(Color::Rgb(239, 241, 245), Color::Indexed(255)),
            header_accent_bg: pick(Color::Rgb(30, 102, 245), Color::Indexed(26)),
            gauge_filled: pick(Color::Rgb(64, 160, 43), Color::Indexed(70)),
            gauge_unfilled: pick(Color::Rgb(204, 208, 218), Color::Indexed(252)),
            sparkline_color: pick(Color::Rgb(254, 100, 11), Color::Indexed(202)),
            table_header_fg: pick(Color::Rgb(136, 57, 239), Color::Indexed(92)),
            selection_fg: pick(Color::Rgb(239, 241, 245), Color::Indexed(255)),
            selection_bg: pick(Color::Rgb(30, 102, 245), Color::Indexed(26)),
            statusbar_bg: pick(Color::Rgb(220, 224, 232), Color::Indexed(253)),
            pill_key_fg: pick(Color::Rgb(239, 241, 245), Color::Indexed(255)),
            pill_key_bg: pick(Color::Rgb(23, 146, 153), Color::Indexed(30)),
            pill_desc_fg: pick(Color::Rgb(92, 95, 119), Color::Indexed(241)),
            accent: pick(Color::Rgb(136, 57, 239), Color::Indexed(92)),
        }
    }
}

fn pick_color(support: ColorSupport, rgb: Color, indexed: Color) -> Color {
    match support {
        ColorSupport::Truecolor => rgb,
        ColorSupport::Mono => Color::Reset,
        _ => indexed,
    }
}
