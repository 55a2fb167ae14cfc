//! HTML character entity decoding
//!
//! Handles the lookup side of entity decoding:
//! - Named entities: the HTML 4 set (`&amp;`, `&eacute;`, `&rArr;`, ...)
//! - Numeric character references: `&#123;` `&#x7B;`
//! - Code point expansion: soft hyphens dropped, presentation ligatures spelled out
//!
//! The table is a compile-time `match`, so lookups need no construction and
//! are safe to share between threads. The scanning side lives in the emitter.

/// What a decoded code point contributes to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Soft hyphen, stripped from output
    Drop,
    /// A single character
    Char(char),
    /// Presentation ligature written as its letters
    Ligature(&'static str),
}

/// Look up a named entity
///
/// Case-sensitive first, so `&Alpha;` and `&alpha;` stay distinct, then an
/// ASCII-lowercased retry so `&AMP;` or `&Nbsp;` still resolve.
pub fn decode_named(name: &str) -> Option<char> {
    if name.is_empty() {
        return None;
    }
    let code = match named_code_point(name) {
        Some(code) => code,
        None if name.bytes().any(|b| b.is_ascii_uppercase()) => {
            named_code_point(&name.to_ascii_lowercase())?
        }
        None => return None,
    };
    char::from_u32(code)
}

/// Parse the leading digits of a numeric reference body
///
/// `digits` is the text after `&#` (decimal) or `&#x` (hex). Parsing stops
/// at the first non-digit. No digits, a zero value, or overflow give `None`.
pub fn decode_numeric(digits: &str, hex: bool) -> Option<u32> {
    let radix = if hex { 16 } else { 10 };
    let mut value: u32 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        value = value.checked_mul(radix)?.checked_add(d)?;
        seen = true;
    }
    (seen && value != 0).then_some(value)
}

/// Expand a decoded code point into its output form
///
/// Returns `None` when the value is not a Unicode scalar value.
pub fn expand_code_point(code: u32) -> Option<Expansion> {
    let expansion = match code {
        173 => Expansion::Drop,
        0xFB00 => Expansion::Ligature("ff"),
        0xFB01 => Expansion::Ligature("fi"),
        0xFB02 => Expansion::Ligature("fl"),
        0xFB03 => Expansion::Ligature("ffi"),
        0xFB04 => Expansion::Ligature("ffl"),
        0xFB05 => Expansion::Ligature("ft"),
        0xFB06 => Expansion::Ligature("st"),
        _ => Expansion::Char(char::from_u32(code)?),
    };
    Some(expansion)
}

/// Named entity table
///
/// `nbsp` maps to a plain space; `apos` is not HTML 4 but common enough to keep.
fn named_code_point(name: &str) -> Option<u32> {
    let code = match name {
        "apos" => 39,
        "gt" => 62,
        "lt" => 60,
        "amp" => 38,
        "quot" => 34,
        "nbsp" => 32,
        // Latin-1
        "iexcl" => 161,
        "cent" => 162,
        "pound" => 163,
        "curren" => 164,
        "yen" => 165,
        "brvbar" => 166,
        "sect" => 167,
        "uml" => 168,
        "copy" => 169,
        "ordf" => 170,
        "laquo" => 171,
        "not" => 172,
        "shy" => 173,
        "reg" => 174,
        "macr" => 175,
        "deg" => 176,
        "plusmn" => 177,
        "sup2" => 178,
        "sup3" => 179,
        "acute" => 180,
        "micro" => 181,
        "para" => 182,
        "middot" => 183,
        "cedil" => 184,
        "sup1" => 185,
        "ordm" => 186,
        "raquo" => 187,
        "frac14" => 188,
        "frac12" => 189,
        "frac34" => 190,
        "iquest" => 191,
        "Agrave" => 192,
        "Aacute" => 193,
        "Acirc" => 194,
        "Atilde" => 195,
        "Auml" => 196,
        "Aring" => 197,
        "AElig" => 198,
        "Ccedil" => 199,
        "Egrave" => 200,
        "Eacute" => 201,
        "Ecirc" => 202,
        "Euml" => 203,
        "Igrave" => 204,
        "Iacute" => 205,
        "Icirc" => 206,
        "Iuml" => 207,
        "ETH" => 208,
        "Ntilde" => 209,
        "Ograve" => 210,
        "Oacute" => 211,
        "Ocirc" => 212,
        "Otilde" => 213,
        "Ouml" => 214,
        "times" => 215,
        "Oslash" => 216,
        "Ugrave" => 217,
        "Uacute" => 218,
        "Ucirc" => 219,
        "Uuml" => 220,
        "Yacute" => 221,
        "THORN" => 222,
        "szlig" => 223,
        "agrave" => 224,
        "aacute" => 225,
        "acirc" => 226,
        "atilde" => 227,
        "auml" => 228,
        "aring" => 229,
        "aelig" => 230,
        "ccedil" => 231,
        "egrave" => 232,
        "eacute" => 233,
        "ecirc" => 234,
        "euml" => 235,
        "igrave" => 236,
        "iacute" => 237,
        "icirc" => 238,
        "iuml" => 239,
        "eth" => 240,
        "ntilde" => 241,
        "ograve" => 242,
        "oacute" => 243,
        "ocirc" => 244,
        "otilde" => 245,
        "ouml" => 246,
        "divide" => 247,
        "oslash" => 248,
        "ugrave" => 249,
        "uacute" => 250,
        "ucirc" => 251,
        "uuml" => 252,
        "yacute" => 253,
        "thorn" => 254,
        "yuml" => 255,
        // Greek and symbols
        "fnof" => 402,
        "Alpha" => 913,
        "Beta" => 914,
        "Gamma" => 915,
        "Delta" => 916,
        "Epsilon" => 917,
        "Zeta" => 918,
        "Eta" => 919,
        "Theta" => 920,
        "Iota" => 921,
        "Kappa" => 922,
        "Lambda" => 923,
        "Mu" => 924,
        "Nu" => 925,
        "Xi" => 926,
        "Omicron" => 927,
        "Pi" => 928,
        "Rho" => 929,
        "Sigma" => 931,
        "Tau" => 932,
        "Upsilon" => 933,
        "Phi" => 934,
        "Chi" => 935,
        "Psi" => 936,
        "Omega" => 937,
        "alpha" => 945,
        "beta" => 946,
        "gamma" => 947,
        "delta" => 948,
        "epsilon" => 949,
        "zeta" => 950,
        "eta" => 951,
        "theta" => 952,
        "iota" => 953,
        "kappa" => 954,
        "lambda" => 955,
        "mu" => 956,
        "nu" => 957,
        "xi" => 958,
        "omicron" => 959,
        "pi" => 960,
        "rho" => 961,
        "sigmaf" => 962,
        "sigma" => 963,
        "tau" => 964,
        "upsilon" => 965,
        "phi" => 966,
        "chi" => 967,
        "psi" => 968,
        "omega" => 969,
        "thetasym" => 977,
        "upsih" => 978,
        "piv" => 982,
        "bull" => 8226,
        "hellip" => 8230,
        "prime" => 8242,
        "Prime" => 8243,
        "oline" => 8254,
        "frasl" => 8260,
        "weierp" => 8472,
        "image" => 8465,
        "real" => 8476,
        "trade" => 8482,
        "alefsym" => 8501,
        "larr" => 8592,
        "uarr" => 8593,
        "rarr" => 8594,
        "darr" => 8595,
        "harr" => 8596,
        "crarr" => 8629,
        "lArr" => 8656,
        "uArr" => 8657,
        "rArr" => 8658,
        "dArr" => 8659,
        "hArr" => 8660,
        "forall" => 8704,
        "part" => 8706,
        "exist" => 8707,
        "empty" => 8709,
        "nabla" => 8711,
        "isin" => 8712,
        "notin" => 8713,
        "ni" => 8715,
        "prod" => 8719,
        "sum" => 8721,
        "minus" => 8722,
        "lowast" => 8727,
        "radic" => 8730,
        "prop" => 8733,
        "infin" => 8734,
        "ang" => 8736,
        "and" => 8743,
        "or" => 8744,
        "cap" => 8745,
        "cup" => 8746,
        "int" => 8747,
        "there4" => 8756,
        "sim" => 8764,
        "cong" => 8773,
        "asymp" => 8776,
        "ne" => 8800,
        "equiv" => 8801,
        "le" => 8804,
        "ge" => 8805,
        "sub" => 8834,
        "sup" => 8835,
        "nsub" => 8836,
        "sube" => 8838,
        "supe" => 8839,
        "oplus" => 8853,
        "otimes" => 8855,
        "perp" => 8869,
        "sdot" => 8901,
        "lceil" => 8968,
        "rceil" => 8969,
        "lfloor" => 8970,
        "rfloor" => 8971,
        "lang" => 9001,
        "rang" => 9002,
        "loz" => 9674,
        "spades" => 9824,
        "clubs" => 9827,
        "hearts" => 9829,
        "diams" => 9830,
        // Latin Extended and punctuation
        "OElig" => 338,
        "oelig" => 339,
        "Scaron" => 352,
        "scaron" => 353,
        "Yuml" => 376,
        "circ" => 710,
        "tilde" => 732,
        "ensp" => 8194,
        "emsp" => 8195,
        "thinsp" => 8201,
        "zwnj" => 8204,
        "zwj" => 8205,
        "lrm" => 8206,
        "rlm" => 8207,
        "ndash" => 8211,
        "mdash" => 8212,
        "lsquo" => 8216,
        "rsquo" => 8217,
        "sbquo" => 8218,
        "ldquo" => 8220,
        "rdquo" => 8221,
        "bdquo" => 8222,
        "dagger" => 8224,
        "Dagger" => 8225,
        "permil" => 8240,
        "lsaquo" => 8249,
        "rsaquo" => 8250,
        "euro" => 8364,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_named() {
        assert_eq!(decode_named("amp"), Some('&'));
        assert_eq!(decode_named("lt"), Some('<'));
        assert_eq!(decode_named("nbsp"), Some(' '));
        assert_eq!(decode_named("eacute"), Some('é'));
        assert_eq!(decode_named("euro"), Some('€'));
    }

    #[test]
    fn test_case_sensitive_first() {
        assert_eq!(decode_named("Alpha"), Some('Α'));
        assert_eq!(decode_named("alpha"), Some('α'));
        assert_eq!(decode_named("rArr"), Some('⇒'));
        assert_eq!(decode_named("rarr"), Some('→'));
    }

    #[test]
    fn test_lowercase_fallback() {
        assert_eq!(decode_named("AMP"), Some('&'));
        assert_eq!(decode_named("Nbsp"), Some(' '));
        assert_eq!(decode_named("ALPHA"), Some('α'));
    }

    #[test]
    fn test_unknown_named() {
        assert_eq!(decode_named("bogus"), None);
        assert_eq!(decode_named(""), None);
    }

    #[test]
    fn test_corrected_names() {
        assert_eq!(decode_named("cedil"), Some('\u{B8}'));
        assert_eq!(decode_named("frac12"), Some('½'));
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_numeric("65", false), Some(65));
        assert_eq!(decode_numeric("41", true), Some(0x41));
        assert_eq!(decode_numeric("3bx", true), Some(0x3B));
        assert_eq!(decode_numeric("12abc", false), Some(12));
        assert_eq!(decode_numeric("0", false), None);
        assert_eq!(decode_numeric("", false), None);
        assert_eq!(decode_numeric("zz", true), None);
        assert_eq!(decode_numeric("99999999999", false), None);
    }

    #[test]
    fn test_expand_code_point() {
        assert_eq!(expand_code_point(173), Some(Expansion::Drop));
        assert_eq!(expand_code_point(0xFB01), Some(Expansion::Ligature("fi")));
        assert_eq!(expand_code_point(0xFB03), Some(Expansion::Ligature("ffi")));
        assert_eq!(expand_code_point(233), Some(Expansion::Char('é')));
        assert_eq!(expand_code_point(0xD800), None);
    }
}
