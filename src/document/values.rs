//! Decoders for the string-encoded attribute values of SimplePDL documents.
//!
//! All decoders are strict: tokens are split on `,` with no whitespace tolerance and the decimal
//! separator is always `.`. A missing attribute (`None`) decodes to the documented default, but a
//! present attribute that fails to decode is always an error.

use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::foundation::error::{PdlError, PdlResult};

/// Decode exactly `N` comma separated reals.
pub fn parse_reals<const N: usize>(s: &str) -> PdlResult<[f64; N]> {
    let mut out = [0.0; N];
    let mut count = 0usize;
    for token in s.split(',') {
        if count < N {
            out[count] = token.parse::<f64>().map_err(|_| {
                PdlError::format(format!("'{token}' is not a real number (in \"{s}\")"))
            })?;
        }
        count += 1;
    }
    if count != N {
        return Err(PdlError::format(format!(
            "expected {N} comma separated values, found {count} (in \"{s}\")"
        )));
    }
    Ok(out)
}

/// Decode `#RRGGBB` (opaque) or `#AARRGGBB`. `None` is fully transparent.
pub fn parse_color(s: Option<&str>) -> PdlResult<Color> {
    let Some(s) = s else {
        return Ok(Color::TRANSPARENT);
    };
    // Byte offsets below assume one byte per character.
    if !s.is_ascii() || !s.starts_with('#') || (s.len() != 7 && s.len() != 9) {
        return Err(PdlError::format(format!(
            "invalid color '{s}', expected #RRGGBB or #AARRGGBB"
        )));
    }

    let byte_at = |i: usize| -> PdlResult<u8> {
        let pair = &s[i..i + 2];
        let invalid = || PdlError::format(format!("invalid hex pair '{pair}' in color '{s}'"));
        // from_str_radix tolerates a leading sign; hex digits only.
        if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u8::from_str_radix(pair, 16).map_err(|_| invalid())
    };

    if s.len() == 9 {
        Ok(Color::argb(byte_at(1)?, byte_at(3)?, byte_at(5)?, byte_at(7)?))
    } else {
        Ok(Color::rgb(byte_at(1)?, byte_at(3)?, byte_at(5)?))
    }
}

/// Decode `m11,m12,m21,m22,m31,m32`. `None` is the identity.
///
/// Coefficients map points as `x' = m11*x + m21*y + m31` and `y' = m12*x + m22*y + m32`, which is
/// exactly kurbo's coefficient order.
pub fn parse_matrix(s: Option<&str>) -> PdlResult<Affine> {
    match s {
        None => Ok(Affine::IDENTITY),
        Some(s) => Ok(Affine::new(parse_reals::<6>(s)?)),
    }
}

/// Decode `left,top,right,bottom`. `None` is the all-zero empty rectangle.
pub fn parse_rect(s: Option<&str>) -> PdlResult<Rect> {
    match s {
        None => Ok(Rect::ZERO),
        Some(s) => {
            let [left, top, right, bottom] = parse_reals::<4>(s)?;
            Ok(Rect::new(left, top, right, bottom))
        }
    }
}

/// Decode `x,y`. `None` is the origin.
pub fn parse_vector(s: Option<&str>) -> PdlResult<Point> {
    match s {
        None => Ok(Point::ZERO),
        Some(s) => {
            let [x, y] = parse_reals::<2>(s)?;
            Ok(Point::new(x, y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn reals_keep_order_and_values() {
        assert_eq!(parse_reals::<2>("1.5,-2").unwrap(), [1.5, -2.0]);
        assert_eq!(
            parse_reals::<4>("0,10.25,3e2,-0.5").unwrap(),
            [0.0, 10.25, 300.0, -0.5]
        );
    }

    #[test]
    fn reals_reject_wrong_arity() {
        assert!(parse_reals::<2>("1").unwrap_err().is_format());
        assert!(parse_reals::<2>("1,2,3").unwrap_err().is_format());
        assert!(parse_reals::<2>("").unwrap_err().is_format());
    }

    #[test]
    fn reals_are_strict_about_tokens() {
        assert!(parse_reals::<2>("1, 2").is_err());
        assert!(parse_reals::<2>("1;2,3").is_err());
        assert!(parse_reals::<2>("1,abc").is_err());
        assert!(parse_reals::<1>("1,5").is_err());
    }

    #[test]
    fn color_defaults_and_forms() {
        assert_eq!(parse_color(None).unwrap(), Color::argb(0, 0, 0, 0));
        assert_eq!(
            parse_color(Some("#FF8800")).unwrap(),
            Color::argb(255, 255, 136, 0)
        );
        assert_eq!(
            parse_color(Some("#80FF8800")).unwrap(),
            Color::argb(128, 255, 136, 0)
        );
        assert_eq!(
            parse_color(Some("#ff8800")).unwrap(),
            Color::argb(255, 255, 136, 0)
        );
    }

    #[test]
    fn color_rejects_bad_input() {
        assert!(parse_color(Some("#ABC")).unwrap_err().is_format());
        assert!(parse_color(Some("#GG0000")).is_err());
        assert!(parse_color(Some("#12345678A")).is_err());
        assert!(parse_color(Some("")).is_err());
        assert!(parse_color(Some("#+10000")).is_err());
    }

    #[test]
    fn matrix_defaults_to_identity() {
        assert_eq!(parse_matrix(None).unwrap(), Affine::IDENTITY);
    }

    #[test]
    fn matrix_translation() {
        let m = parse_matrix(Some("1,0,0,1,5,10")).unwrap();
        assert_eq!(m, Affine::translate(Vec2::new(5.0, 10.0)));
        assert_eq!(m * Point::new(1.0, 1.0), Point::new(6.0, 11.0));
    }

    #[test]
    fn matrix_coefficient_order() {
        // m21 feeds y into x'.
        let m = parse_matrix(Some("1,0,2,1,0,0")).unwrap();
        assert_eq!(m * Point::new(0.0, 1.0), Point::new(2.0, 1.0));
        assert!(parse_matrix(Some("1,0,0,1")).is_err());
    }

    #[test]
    fn rect_and_vector() {
        assert_eq!(parse_rect(None).unwrap(), Rect::ZERO);
        assert_eq!(
            parse_rect(Some("1,2,30,40")).unwrap(),
            Rect::new(1.0, 2.0, 30.0, 40.0)
        );
        assert!(parse_rect(Some("1,2,3")).is_err());

        assert_eq!(parse_vector(None).unwrap(), Point::ZERO);
        assert_eq!(parse_vector(Some("3,-4")).unwrap(), Point::new(3.0, -4.0));
        assert!(parse_vector(Some("3")).is_err());
    }
}
