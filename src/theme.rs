use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// 画面全体の表示モード。永続化は"light"/"dark"の文字列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            DisplayMode::Light => "☀ light",
            DisplayMode::Dark => "☾ dark",
        }
    }
}

/// モードごとの配色セット
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub font: Color,
    pub accent: Color,
    pub inactive: Color,
    pub done: Color,
    pub border: Color,
}

impl Theme {
    pub fn of(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Theme {
                bg: Color::White,
                font: Color::Black,
                accent: Color::Magenta,
                inactive: Color::DarkGray,
                done: Color::Gray,
                border: Color::DarkGray,
            },
            DisplayMode::Dark => Theme {
                bg: Color::Black,
                font: Color::White,
                accent: Color::LightMagenta,
                inactive: Color::DarkGray,
                done: Color::DarkGray,
                border: Color::Gray,
            },
        }
    }
}
