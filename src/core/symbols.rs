//! Legacy Symbol font remapping
//!
//! Old HTML rendered Greek letters and math glyphs by setting a run of plain
//! Latin characters in the "Symbol" font (`<font face="Symbol">abc</font>`
//! shows as αβχ). Text from such a run is remapped to the Unicode characters
//! the font would have drawn. Characters with no Symbol glyph pass through.

/// Map one character through the Symbol font table
pub fn symbol_font_lookup(c: char) -> char {
    let mapped = match c as u32 {
        // Greek capitals
        65 => 913,
        66 => 914,
        71 => 915,
        68 => 916,
        69 => 917,
        90 => 918,
        72 => 919,
        81 => 920,
        73 => 921,
        75 => 922,
        76 => 923,
        77 => 924,
        78 => 925,
        88 => 926,
        79 => 927,
        80 => 928,
        82 => 929,
        83 => 931,
        84 => 932,
        85 => 933,
        70 => 934,
        67 => 935,
        89 => 936,
        87 => 937,
        // Greek lowercase
        97 => 945,
        98 => 946,
        103 => 947,
        100 => 948,
        101 => 949,
        122 => 950,
        104 => 951,
        113 => 952,
        105 => 953,
        107 => 954,
        108 => 955,
        109 => 956,
        110 => 957,
        120 => 958,
        111 => 959,
        112 => 960,
        114 => 961,
        86 => 962,
        115 => 963,
        116 => 964,
        117 => 965,
        102 => 966,
        99 => 967,
        121 => 968,
        119 => 969,
        74 => 977,
        161 => 978,
        106 => 981,
        118 => 982,
        // arrows
        171 => 8596,
        172 => 8592,
        173 => 8593,
        174 => 8594,
        175 => 8595,
        191 => 8629,
        219 => 8660,
        220 => 8656,
        221 => 8657,
        222 => 8658,
        223 => 8659,
        // math
        34 => 8704,
        36 => 8707,
        39 => 8717,
        42 => 8727,
        45 => 8722,
        64 => 8773,
        92 => 8756,
        94 => 8869,
        126 => 8764,
        163 => 8804,
        165 => 8734,
        179 => 8805,
        181 => 8733,
        182 => 8706,
        183 => 8729,
        185 => 8800,
        186 => 8801,
        187 => 8776,
        196 => 8855,
        197 => 8853,
        198 => 8709,
        199 => 8745,
        200 => 8746,
        201 => 8835,
        202 => 8839,
        203 => 8836,
        204 => 8834,
        205 => 8838,
        206 => 8712,
        207 => 8713,
        208 => 8736,
        209 => 8711,
        213 => 8719,
        214 => 8730,
        215 => 8901,
        217 => 8743,
        218 => 8744,
        229 => 8721,
        242 => 8747,
        224 => 9674,
        // brackets and extenders
        189 => 9168,
        190 => 9135,
        225 => 9001,
        230 => 9115,
        231 => 9116,
        232 => 9117,
        233 => 9121,
        234 => 9122,
        235 => 9123,
        236 => 9127,
        237 => 9128,
        238 => 9129,
        239 => 9130,
        241 => 9002,
        243 => 8992,
        244 => 9134,
        245 => 8993,
        246 => 9118,
        247 => 9119,
        248 => 9120,
        249 => 9124,
        250 => 9125,
        251 => 9126,
        252 => 9131,
        253 => 9132,
        254 => 9133,
        // Latin-1 operators
        180 => 215,
        184 => 247,
        216 => 172,
        _ => return c,
    };
    char::from_u32(mapped).unwrap_or(c)
}

/// Remap a whole run of Symbol-font text
pub fn remap_symbol_text(text: &str) -> String {
    text.chars().map(symbol_font_lookup).collect()
}

/// Whether a font face value selects the Symbol font
///
/// Only the first six characters are compared (ASCII case-insensitive), so
/// faces such as "Symbolic" are treated as Symbol too.
pub fn is_symbol_font(face: &str) -> bool {
    face.as_bytes()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"symbol"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_letters() {
        assert_eq!(remap_symbol_text("abc"), "αβχ");
        assert_eq!(remap_symbol_text("SW"), "ΣΩ");
    }

    #[test]
    fn test_math_and_arrows() {
        assert_eq!(symbol_font_lookup('\u{AE}'), '→');
        assert_eq!(symbol_font_lookup('\u{B4}'), '×');
        assert_eq!(symbol_font_lookup('"'), '∀');
    }

    #[test]
    fn test_unmapped_passthrough() {
        assert_eq!(symbol_font_lookup('1'), '1');
        assert_eq!(symbol_font_lookup(' '), ' ');
        assert_eq!(symbol_font_lookup('€'), '€');
    }

    #[test]
    fn test_is_symbol_font() {
        assert!(is_symbol_font("Symbol"));
        assert!(is_symbol_font("SYMBOL"));
        assert!(!is_symbol_font("Arial"));
        assert!(!is_symbol_font("Symb"));
    }

    #[test]
    fn test_is_symbol_font_prefix_over_match() {
        assert!(is_symbol_font("Symbolic"));
        assert!(is_symbol_font("symbol, serif"));
    }
}
