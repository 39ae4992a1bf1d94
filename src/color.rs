//! Display colors for categories.
use rand::RngExt;

const PALETTE: &[&str] = &[
    "#FF9800", "#2196F3", "#4CAF50", "#E91E63", "#9C27B0", "#00BCD4", "#FFC107",
    "#8BC34A", "#FF5722", "#3F51B5", "#009688", "#CDDC39",
];

/// Checks for a `#RRGGBB` hex color.
pub fn is_valid_hex(s: &str) -> bool {
    s.starts_with('#') && s.len() == 7 && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn random_color() -> String {
    let mut rng = rand::rng();
    PALETTE[rng.random_range(0..PALETTE.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_validation() {
        assert!(is_valid_hex("#1a2B3c"));
        assert!(!is_valid_hex("1a2B3c"));
        assert!(!is_valid_hex("#1a2B3"));
        assert!(!is_valid_hex("#GGGGGG"));
    }

    #[test]
    fn palette_colors_are_valid() {
        assert!(PALETTE.iter().all(|c| is_valid_hex(c)));
        assert!(is_valid_hex(&random_color()));
    }
}
