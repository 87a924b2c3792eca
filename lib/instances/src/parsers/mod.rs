mod augmented;
pub use augmented::{AugmentedFmt, parse_augmented};

mod nom_prelude {
  pub use nom::{
    IResult,
    error::{
      self,
      ParseError,
      FromExternalError,
    },
    combinator::*,
    character::complete::*,
    number::complete::double,
  };
  pub use std::str::FromStr;
  pub use std::num::ParseIntError;
}

pub(crate) mod common;

pub trait ParseInstance<Fmt>: Sized {
  fn parse(inputs: Fmt) -> crate::Result<Self>;
}
