//! Parsing utilities

/// Implement [`std::str::FromStr`] using parser. Type must have `parse` method implemented.
macro_rules! impl_from_str_via_parser {
    ($t: ident) => {
        impl std::str::FromStr for $t {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match $t::parse($crate::parsing::Parser::new(s)) {
                    Some((p, result)) if p.input.is_empty() => Ok(result),
                    Some(_) => Err("Parse error: leftover input"),
                    None => Err("Parse error: parser failed"),
                }
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                use std::str::FromStr;

                $t::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
            }
        }
    };
}
pub(crate) use impl_from_str_via_parser;

#[must_use]
#[derive(Debug, Clone, Copy)]
/// Cursor over the unparsed rest of a string
pub struct Parser<'s> {
    /// Remaining unparsed input
    pub input: &'s str,
}

macro_rules! try_option {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}
pub(crate) use try_option;

macro_rules! lexeme {
    ($p:expr, $f:expr) => {{
        match $f($p.trim_whitespace()) {
            None => None,
            Some((p, val)) => Some((p.trim_whitespace(), val)),
        }
    }};
}
pub(crate) use lexeme;

impl<'s> Parser<'s> {
    /// Create new parser marking the beginning of the input
    pub const fn new(input: &'s str) -> Parser<'s> {
        Parser { input }
    }

    /// Skip leading whitespace
    pub fn trim_whitespace(self) -> Parser<'s> {
        Parser::new(self.input.trim_start())
    }

    /// Consume `expected` if the input starts with it
    pub fn parse_ascii_char(self, expected: char) -> Option<Parser<'s>> {
        self.input.strip_prefix(expected).map(Parser::new)
    }

    /// Parse unsigned decimal number, failing on overflow
    pub fn parse_u32(self) -> Option<(Parser<'s>, u32)> {
        let digits = self
            .input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.input.len());
        if digits == 0 {
            return None;
        }
        let value = self.input[..digits].parse().ok()?;
        Some((Parser::new(&self.input[digits..]), value))
    }

    /// Parse comma separated list of unsigned numbers. Trailing comma is not allowed.
    pub fn parse_u32_list(self) -> Option<(Parser<'s>, Vec<u32>)> {
        let mut values = Vec::new();
        let mut p = self.trim_whitespace();

        if let Some((rest, first)) = lexeme!(p, Parser::parse_u32) {
            values.push(first);
            p = rest;
            while let Some(rest) = p.parse_ascii_char(',') {
                let (rest, value) = try_option!(lexeme!(rest, Parser::parse_u32));
                values.push(value);
                p = rest;
            }
        }

        Some((p, values))
    }
}
