use plotters::style::RGBColor;

pub const FALLBACK: RGBColor = RGBColor(0xAA, 0xAA, 0xAA);

pub const NORMAL: RGBColor = RGBColor(0x68, 0x90, 0xF0);
pub const LEGENDARY: RGBColor = RGBColor(0xF8, 0x58, 0x88);
pub const LEGENDARY_LABEL: RGBColor = RGBColor(0xC0, 0x30, 0x28);
pub const MEAN_LINE: RGBColor = RGBColor(0xE0, 0x20, 0x20);
pub const MEDIAN_LINE: RGBColor = RGBColor(0xFF, 0xA5, 0x00);
pub const GRID_LABEL: RGBColor = RGBColor(0x66, 0x66, 0x66);

pub const TYPE_COLORS: [(&str, RGBColor); 18] = [
    ("fire", RGBColor(0xF0, 0x80, 0x30)),
    ("water", RGBColor(0x68, 0x90, 0xF0)),
    ("grass", RGBColor(0x78, 0xC8, 0x50)),
    ("electric", RGBColor(0xF8, 0xD0, 0x30)),
    ("psychic", RGBColor(0xF8, 0x58, 0x88)),
    ("ice", RGBColor(0x98, 0xD8, 0xD8)),
    ("dragon", RGBColor(0x70, 0x38, 0xF8)),
    ("dark", RGBColor(0x70, 0x58, 0x48)),
    ("fairy", RGBColor(0xEE, 0x99, 0xAC)),
    ("normal", RGBColor(0xA8, 0xA8, 0x78)),
    ("fighting", RGBColor(0xC0, 0x30, 0x28)),
    ("flying", RGBColor(0xA8, 0x90, 0xF0)),
    ("poison", RGBColor(0xA0, 0x40, 0xA0)),
    ("ground", RGBColor(0xE0, 0xC0, 0x68)),
    ("rock", RGBColor(0xB8, 0xA0, 0x38)),
    ("bug", RGBColor(0xA8, 0xB8, 0x20)),
    ("ghost", RGBColor(0x70, 0x58, 0x98)),
    ("steel", RGBColor(0xB8, 0xB8, 0xD0)),
];

pub fn type_color(type_name: Option<&str>) -> RGBColor {
    type_name
        .and_then(|name| {
            TYPE_COLORS
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        })
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK)
}

const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Diverging blue → grey → red scale for values in `[-1, 1]`.
pub fn coolwarm(value: f64) -> RGBColor {
    let value = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    let (from, to, t) = if value < 0.0 {
        (COOL, NEUTRAL, value + 1.0)
    } else {
        (NEUTRAL, WARM, value)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}
