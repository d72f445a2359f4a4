use plotters::style::RGBColor;

/// Chart theme configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    pub background_color: RGBColor,
    pub text_color: RGBColor,
    pub grid_color: RGBColor,
    pub axis_color: RGBColor,
}

impl ChartTheme {
    pub fn light() -> Self {
        Self {
            background_color: RGBColor(255, 255, 255),
            text_color: RGBColor(55, 65, 81),
            grid_color: RGBColor(229, 231, 235),
            axis_color: RGBColor(107, 114, 128),
        }
    }

    pub fn dark() -> Self {
        Self {
            background_color: RGBColor(17, 24, 39),
            text_color: RGBColor(209, 213, 219),
            grid_color: RGBColor(55, 65, 81),
            axis_color: RGBColor(156, 163, 175),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub line_width: u32,
    pub point_size: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            point_size: 4,
            font_size: 15,
            caption_size: 24,
            margin: 10,
            label_area_size: 60,
        }
    }
}

/// Parse `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(token: &str) -> Option<RGBColor> {
    let hex = token.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
