use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const ADDRESS: Color = Color::TrueColor { r: 150, g: 230, b: 160 };
pub const HASH: Color = Color::TrueColor { r: 190, g: 160, b: 255 };
