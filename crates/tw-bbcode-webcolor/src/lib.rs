use racros::AutoStr;

/// Web colors with a name in bbcode.
///
/// There are 40 kinds of pre-defined colors available, the ones offered by common forum editors.
/// Any other color is written as a hex value.
#[derive(AutoStr, Clone, Copy, Debug, PartialEq, Eq)]
#[autorule = "PascalCase"]
pub enum WebColor {
    Black,
    Sienna,
    DarkOliveGreen,
    DarkGreen,
    DarkSlateBlue,
    Navy,
    Indigo,
    DarkSlateGray,
    DarkRed,
    DarkOrange,
    Olive,
    Green,
    Teal,
    Blue,
    SlateGray,
    DimGray,
    Red,
    SandyBrown,
    YellowGreen,
    SeaGreen,
    MediumTurquoise,
    RoyalBlue,
    Purple,
    Gray,
    Magenta,
    Orange,
    Yellow,
    Lime,
    Cyan,
    DeepSkyBlue,
    DarkOrchid,
    Silver,
    Pink,
    Wheat,
    LemonChiffon,
    PaleGreen,
    PaleTurquoise,
    LightBlue,
    Plum,
    White,
}

impl WebColor {
    /// All named colors, in editor palette order.
    pub const ALL: [WebColor; 40] = [
        WebColor::Black,
        WebColor::Sienna,
        WebColor::DarkOliveGreen,
        WebColor::DarkGreen,
        WebColor::DarkSlateBlue,
        WebColor::Navy,
        WebColor::Indigo,
        WebColor::DarkSlateGray,
        WebColor::DarkRed,
        WebColor::DarkOrange,
        WebColor::Olive,
        WebColor::Green,
        WebColor::Teal,
        WebColor::Blue,
        WebColor::SlateGray,
        WebColor::DimGray,
        WebColor::Red,
        WebColor::SandyBrown,
        WebColor::YellowGreen,
        WebColor::SeaGreen,
        WebColor::MediumTurquoise,
        WebColor::RoyalBlue,
        WebColor::Purple,
        WebColor::Gray,
        WebColor::Magenta,
        WebColor::Orange,
        WebColor::Yellow,
        WebColor::Lime,
        WebColor::Cyan,
        WebColor::DeepSkyBlue,
        WebColor::DarkOrchid,
        WebColor::Silver,
        WebColor::Pink,
        WebColor::Wheat,
        WebColor::LemonChiffon,
        WebColor::PaleGreen,
        WebColor::PaleTurquoise,
        WebColor::LightBlue,
        WebColor::Plum,
        WebColor::White,
    ];

    /// Find the named color, ignoring case.
    ///
    /// `darkred`, `DarkRed` and `DARKRED` all give [WebColor::DarkRed].
    pub fn from_name(name: &str) -> Option<WebColor> {
        WebColor::ALL
            .into_iter()
            .find(|x| x.to_string().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::WebColor;

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(WebColor::from_name("darkred"), Some(WebColor::DarkRed));
        assert_eq!(WebColor::from_name("LEMONCHIFFON"), Some(WebColor::LemonChiffon));
        assert_eq!(WebColor::from_name("ff0000"), None);
        assert_eq!(WebColor::from_name(""), None);
    }

    #[test]
    fn test_name_is_pascal_case() {
        assert_eq!(WebColor::DeepSkyBlue.to_string(), "DeepSkyBlue");
    }
}
