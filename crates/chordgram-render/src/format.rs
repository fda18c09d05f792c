//! d3-format compatible `formatPrefix` for tick and tooltip labels.

use crate::{Error, Result};
use chordgram_layout::path::js_number;
use regex::Regex;
use std::sync::OnceLock;

const PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "\u{b5}", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];
const MINUS: char = '\u{2212}';

#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    fill: char,
    align: char,
    sign: char,
    currency: bool,
    zero: bool,
    width: Option<usize>,
    comma: bool,
    precision: Option<usize>,
    trim: bool,
}

impl Specifier {
    fn parse(text: &str) -> Result<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();

        let re = RE.get_or_init(|| {
            Regex::new(r"^(?:(.)?([<>=^]))?([+\-( ])?([$#])?(0)?(\d+)?(,)?(\.\d+)?(~)?([a-z%])?$")
                .expect("static format specifier pattern")
        });
        let invalid = || Error::InvalidFormatSpecifier {
            specifier: text.to_string(),
        };
        let caps = re.captures(text).ok_or_else(invalid)?;
        let ch = |i: usize| caps.get(i).and_then(|m| m.as_str().chars().next());

        let mut spec = Self {
            fill: ch(1).unwrap_or(' '),
            align: ch(2).unwrap_or('>'),
            sign: ch(3).unwrap_or('-'),
            currency: ch(4) == Some('$'),
            zero: caps.get(5).is_some(),
            width: match caps.get(6) {
                Some(m) => Some(m.as_str().parse().map_err(|_| invalid())?),
                None => None,
            },
            comma: caps.get(7).is_some(),
            precision: match caps.get(8) {
                Some(m) => Some(m.as_str()[1..].parse().map_err(|_| invalid())?),
                None => None,
            },
            trim: caps.get(9).is_some(),
        };
        if spec.zero || (spec.fill == '0' && spec.align == '=') {
            spec.zero = true;
            spec.fill = '0';
            spec.align = '=';
        }
        Ok(spec)
    }
}

/// Formats values against a fixed SI prefix, like `d3.formatPrefix(specifier, scale)`.
///
/// The specifier's type is always treated as `f`; its precision (default 6) counts digits after
/// the decimal point of the scaled value.
///
/// ```
/// use chordgram_render::PrefixFormat;
///
/// let f = PrefixFormat::new(",.0", 1e3).unwrap();
/// assert_eq!(f.format(27_000.0), "27k");
/// assert_eq!(f.format(1_500_000.0), "1,500k");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFormat {
    spec: Specifier,
    exponent: i32,
    prefix: &'static str,
}

impl PrefixFormat {
    pub fn new(specifier: &str, scale: f64) -> Result<Self> {
        let spec = Specifier::parse(specifier)?;
        if !(scale.is_finite() && scale != 0.0) {
            return Err(Error::InvalidSetting {
                key: "ticks.scale".to_string(),
                message: format!("prefix scale must be finite and non-zero, got {scale}"),
            });
        }
        let exponent = ((decimal_exponent(scale) as f64 / 3.0).floor() as i32).clamp(-8, 8) * 3;
        let prefix = PREFIXES[(8 + exponent / 3) as usize];
        Ok(Self {
            spec,
            exponent,
            prefix,
        })
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn format(&self, value: f64) -> String {
        let mut out = self.format_number(value * 10f64.powi(-self.exponent));
        out.push_str(self.prefix);
        out
    }

    fn format_number(&self, value: f64) -> String {
        let spec = &self.spec;
        let precision = spec.precision.unwrap_or(6).min(20);

        let mut negative = value < 0.0 || (value == 0.0 && value.is_sign_negative());
        let mut digits = if value.is_nan() {
            "NaN".to_string()
        } else {
            to_fixed(value.abs(), precision)
        };
        if spec.trim {
            digits = trim_insignificant(&digits);
        }
        if negative && digits.parse::<f64>().is_ok_and(|v| v == 0.0) && spec.sign != '+' {
            negative = false;
        }

        let mut prefix = String::new();
        if negative {
            prefix.push(if spec.sign == '(' { '(' } else { MINUS });
        } else if spec.sign != '-' && spec.sign != '(' {
            prefix.push(spec.sign);
        }
        if spec.currency {
            prefix.push('$');
        }

        let mut suffix = String::new();
        if let Some(pos) = digits.find(|c: char| !c.is_ascii_digit()) {
            suffix.push_str(&digits[pos..]);
            digits.truncate(pos);
        }
        if negative && spec.sign == '(' {
            suffix.push(')');
        }

        let width = spec.width.unwrap_or(0);
        if spec.comma && !spec.zero {
            digits = group_thousands(&digits, usize::MAX);
        }
        let len = prefix.chars().count() + digits.chars().count() + suffix.chars().count();
        let mut padding: String = if len < width {
            std::iter::repeat_n(spec.fill, width - len).collect()
        } else {
            String::new()
        };
        if spec.comma && spec.zero {
            let limit = if padding.is_empty() {
                usize::MAX
            } else {
                width.saturating_sub(suffix.chars().count())
            };
            digits = group_thousands(&format!("{padding}{digits}"), limit);
            padding.clear();
        }

        match spec.align {
            '<' => format!("{prefix}{digits}{suffix}{padding}"),
            '=' => format!("{prefix}{padding}{digits}{suffix}"),
            '^' => {
                let half = padding.chars().count() / 2;
                let (left, right): (String, String) = {
                    let chars: Vec<char> = padding.chars().collect();
                    (chars[..half].iter().collect(), chars[half..].iter().collect())
                };
                format!("{left}{prefix}{digits}{suffix}{right}")
            }
            _ => format!("{padding}{prefix}{digits}{suffix}"),
        }
    }
}

/// Power of ten of the leading digit of `|x|`, as d3-format's `exponent` computes it.
fn decimal_exponent(x: f64) -> i32 {
    let s = format!("{:e}", x.abs());
    s.split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0)
}

/// `Number#toFixed` for a non-negative value: exact ties round up, not to even.
fn to_fixed(x: f64, digits: usize) -> String {
    if x >= 1e21 {
        return js_number(x);
    }
    if is_exact_tie(x, digits) {
        return format!("{:.*}", digits, x.next_up());
    }
    format!("{x:.digits$}")
}

fn is_exact_tie(x: f64, digits: usize) -> bool {
    let probe = format!("{:.*}", digits + 1, x);
    if !probe.ends_with('5') {
        return false;
    }
    // Every finite f64 has at most 1074 fractional decimal digits.
    let exact = format!("{x:.1074}");
    let Some((_, frac)) = exact.split_once('.') else {
        return false;
    };
    let tail = &frac[digits..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

fn trim_insignificant(s: &str) -> String {
    match s.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        }
        None => s.to_string(),
    }
}

/// en-US grouping (groups of three, `,` separator), limited to `width` characters.
fn group_thousands(digits: &str, width: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut i = chars.len();
    let mut length = 0usize;
    while i > 0 {
        let mut g = 3usize;
        if length + g + 1 > width {
            g = width.saturating_sub(length).max(1);
        }
        let start = i.saturating_sub(g);
        groups.push(chars[start..i].iter().collect());
        i = start;
        length += g + 1;
        if length > width {
            break;
        }
    }
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(spec: &str, scale: f64) -> PrefixFormat {
        PrefixFormat::new(spec, scale).unwrap()
    }

    #[test]
    fn thousands_prefix_for_tick_labels() {
        let k = f(",.0", 1e3);
        assert_eq!(k.format(0.0), "0k");
        assert_eq!(k.format(1000.0), "1k");
        assert_eq!(k.format(29630.0), "30k");
        assert_eq!(k.format(12_345_678.0), "12,346k");
    }

    #[test]
    fn exact_ties_round_up_like_to_fixed() {
        let k = f(",.0", 1e3);
        assert_eq!(k.format(500.0), "1k");
        assert_eq!(k.format(2500.0), "3k");
        assert_eq!(k.format(1499.0), "1k");
    }

    #[test]
    fn negative_values_use_unicode_minus() {
        let k = f(",.1", 1e3);
        assert_eq!(k.format(-1500.0), "\u{2212}1.5k");
        // Rounds to zero: sign dropped.
        assert_eq!(f(",.0", 1e3).format(-1.0), "0k");
        assert_eq!(f("(,.0", 1e3).format(-2000.0), "(2)k");
    }

    #[test]
    fn prefix_follows_scale_exponent() {
        assert_eq!(f(",.0", 1e6).prefix(), "M");
        assert_eq!(f(",.0", 2.5e6).prefix(), "M");
        assert_eq!(f(",.0", 999.0).prefix(), "");
        assert_eq!(f(",.0", 1e-3).prefix(), "m");
        assert_eq!(f(",.0", 1e-6).prefix(), "\u{b5}");
        assert_eq!(f(",.0", 1e40).prefix(), "Y");
        assert_eq!(f(".2", 1e6).format(1_234_567.0), "1.23M");
    }

    #[test]
    fn trim_width_and_alignment() {
        assert_eq!(f(".3~", 1e3).format(1500.0), "1.5k");
        assert_eq!(f("8,.0", 1e3).format(1_234_000.0), "   1,234k");
        assert_eq!(f("<6.0", 1e3).format(2000.0), "2     k");
        assert_eq!(f("^5.0", 1e3).format(2000.0), "  2  k");
        assert_eq!(f("06.1", 1e3).format(2500.0), "0002.5k");
        assert_eq!(f("+.0", 1e3).format(2000.0), "+2k");
        assert_eq!(f("$,.0", 1e3).format(5000.0), "$5k");
    }

    #[test]
    fn rejects_malformed_specifiers_and_scales() {
        assert!(matches!(
            PrefixFormat::new(",.x", 1e3),
            Err(Error::InvalidFormatSpecifier { .. })
        ));
        assert!(PrefixFormat::new(",.0", 0.0).is_err());
        assert!(PrefixFormat::new(",.0", f64::NAN).is_err());
    }

    #[test]
    fn grouping_respects_zero_padding_width() {
        assert_eq!(f("010,.0", 1e3).format(1_234_000.0), "00,001,234k");
    }
}
