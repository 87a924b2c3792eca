use super::nom_prelude::*;
use crate::raw::drone::Value;

type TokenError<'a> = error::Error<&'a str>;

pub fn usize_<'a, E>(input: &'a str) -> IResult<&'a str, usize, E>
  where
    E: ParseError<&'a str> + error::FromExternalError<&'a str, ParseIntError>
{
  map_res(digit1, usize::from_str)(input)
}

/// `true` if the whole token is a non-negative integer (ASCII digits only).
pub fn is_uint(token: &str) -> bool {
  all_consuming(digit1::<_, TokenError>)(token).is_ok()
}

/// A whole token as `usize`, `None` if it is not a non-negative integer (or overflows).
pub fn uint_token(token: &str) -> Option<usize> {
  all_consuming(usize_::<TokenError>)(token).ok().map(|(_, n)| n)
}

/// Convert a data-row token: whole numbers become [`Value::Int`], other numbers
/// [`Value::Real`] and anything else is kept as [`Value::Text`].
pub fn value(token: &str) -> Value {
  const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63

  match all_consuming(double::<_, TokenError>)(token) {
    Ok((_, x)) if x.is_finite() && x.fract() == 0.0 && x.abs() < I64_BOUND => Value::Int(x as i64),
    Ok((_, x)) => Value::Real(x),
    Err(_) => Value::Text(token.to_string()),
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uint_tokens() {
    assert!(is_uint("0"));
    assert!(is_uint("011"));
    assert!(!is_uint("-1"));
    assert!(!is_uint("1.0"));
    assert!(!is_uint("#Node"));
    assert!(!is_uint(""));
    assert_eq!(uint_token("12"), Some(12));
    assert_eq!(uint_token("99999999999999999999999"), None);
    assert_eq!(uint_token("12a"), None);
  }

  #[test]
  fn token_values() {
    assert_eq!(value("35"), Value::Int(35));
    assert_eq!(value("35.0"), Value::Int(35));
    assert_eq!(value("-4"), Value::Int(-4));
    assert_eq!(value("2.5"), Value::Real(2.5));
    assert_eq!(value("1e-3"), Value::Real(0.001));
    assert_eq!(value("3.2874"), Value::Real(3.2874));
    assert_eq!(value("depot"), Value::Text("depot".into()));
    assert_eq!(value("12kg"), Value::Text("12kg".into()));
  }
}
