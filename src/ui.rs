// src/ui.rs
use iced::Color;
use once_cell::sync::Lazy;

#[derive(Clone)]
pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub footer_bg: Color,
    pub footer_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub accent: Color,
}

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.08, 0.09, 0.11),
    fg: Color::from_rgb(0.95, 0.95, 0.95),
    muted_fg: Color::from_rgb(0.6, 0.65, 0.7),
    footer_bg: Color::from_rgb(0.0078, 0.325, 0.6118), // #02539c
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    header_bg: Color::from_rgb(0.2, 0.2, 0.2),
    header_fg: Color::from_rgb(1.0, 1.0, 1.0),
    accent: Color::from_rgb(0.204, 0.596, 0.859), // #3498db
});

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(1.0, 1.0, 1.0),
    fg: Color::from_rgb(0.1, 0.1, 0.1),
    muted_fg: Color::from_rgb(0.4, 0.45, 0.5),
    footer_bg: Color::from_rgb(0.0078, 0.325, 0.6118), // #02539c
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    header_bg: Color::from_rgb(0.204, 0.596, 0.859), // #3498db
    header_fg: Color::from_rgb(1.0, 1.0, 1.0),
    accent: Color::from_rgb(0.204, 0.596, 0.859),
});
