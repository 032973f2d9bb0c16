//! Localized strings for the secret area
//!
//! Rendering and the DOM shell only ever ask a `TextSource` for a string by
//! key. `Catalog` is the built-in English/Spanish table.

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// Parse a BCP 47 tag, ignoring region ("es-MX" → Es)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }
}

/// Every string the secret area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    GameTitle,
    /// HUD and game-over label
    Score,
    HighScore,
    Start,
    StartMobile,
    Retry,
    GameOver,
    PasswordTitle,
    Submit,
    Denied,
    Hint,
    RevealLoading,
    RevealComplete,
    RevealStart,
    Back,
}

/// Opaque string lookup
pub trait TextSource {
    fn text(&self, key: TextKey) -> &str;
}

/// Built-in string table
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    pub locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl TextSource for Catalog {
    fn text(&self, key: TextKey) -> &str {
        match self.locale {
            Locale::En => english(key),
            Locale::Es => spanish(key),
        }
    }
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::GameTitle => "MEGA RUNNER",
        TextKey::Score => "SCORE",
        TextKey::HighScore => "HI",
        TextKey::Start => "PRESS SPACE TO START",
        TextKey::StartMobile => "TAP TO START",
        TextKey::Retry => "PRESS SPACE TO RETRY",
        TextKey::GameOver => "GAME OVER",
        TextKey::PasswordTitle => "ENTER PASSWORD",
        TextKey::Submit => "SUBMIT",
        TextKey::Denied => "ACCESS DENIED",
        TextKey::Hint => "Hint: think diagonally",
        TextKey::RevealLoading => "LOADING...",
        TextKey::RevealComplete => "READY!",
        TextKey::RevealStart => "START",
        TextKey::Back => "< BACK",
    }
}

fn spanish(key: TextKey) -> &'static str {
    match key {
        TextKey::GameTitle => "MEGA RUNNER",
        TextKey::Score => "PUNTOS",
        TextKey::HighScore => "MAX",
        TextKey::Start => "PULSA ESPACIO PARA EMPEZAR",
        TextKey::StartMobile => "TOCA PARA EMPEZAR",
        TextKey::Retry => "PULSA ESPACIO PARA REINTENTAR",
        TextKey::GameOver => "FIN DEL JUEGO",
        TextKey::PasswordTitle => "INTRODUCE LA CONTRASEÑA",
        TextKey::Submit => "ENVIAR",
        TextKey::Denied => "ACCESO DENEGADO",
        TextKey::Hint => "Pista: piensa en diagonal",
        TextKey::RevealLoading => "CARGANDO...",
        TextKey::RevealComplete => "¡LISTO!",
        TextKey::RevealStart => "EMPEZAR",
        TextKey::Back => "< VOLVER",
    }
}
