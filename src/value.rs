use std::{fmt, path::PathBuf, time::Duration};

/// What an option expects after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Takes no value.
    Flag,
    String,
    Integer,
    Float,
    Duration,
    Path,
}

impl Kind {
    /// The `<...>` hint shown after the option name, empty for flags.
    pub fn hint(self) -> &'static str {
        match self {
            Kind::Flag => "",
            Kind::String => "<value>",
            Kind::Integer => "<number>",
            Kind::Float => "<floating-point number>",
            Kind::Duration => "<duration>",
            Kind::Path => "<path>",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Flag => "flag",
            Kind::String => "value",
            Kind::Integer => "number",
            Kind::Float => "floating-point number",
            Kind::Duration => "duration",
            Kind::Path => "path",
        };
        f.write_str(name)
    }
}

/// A type an option value can be coerced into.
pub trait Value: Sized + 'static {
    const KIND: Kind;

    fn parse(raw: &str) -> Result<Self, String>;
}

impl Value for String {
    const KIND: Kind = Kind::String;

    fn parse(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl Value for PathBuf {
    const KIND: Kind = Kind::Path;

    fn parse(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }
}

impl Value for i64 {
    const KIND: Kind = Kind::Integer;

    fn parse(raw: &str) -> Result<Self, String> {
        raw.parse::<i64>().map_err(|err| err.to_string())
    }
}

impl Value for f64 {
    const KIND: Kind = Kind::Float;

    fn parse(raw: &str) -> Result<Self, String> {
        raw.parse::<f64>().map_err(|err| err.to_string())
    }
}

impl Value for Duration {
    const KIND: Kind = Kind::Duration;

    fn parse(raw: &str) -> Result<Self, String> {
        parse_duration(raw)
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parses a compound time span such as `1h30m`, `1.5s` or `300ms`.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. Every number needs
/// a unit except a lone `0`. Negative spans are rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.starts_with('-') {
        return Err("negative durations are not supported".to_string());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let end = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        let (number, tail) = rest.split_at(end);
        let end = tail.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(end);
        rest = tail;

        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3600 * NANOS_PER_SEC,
            "" => return Err(format!("missing unit after `{}`", number)),
            _ => return Err(format!("unknown unit `{}`", unit)),
        };

        let (int, frac) = number.split_once('.').unwrap_or((number, ""));
        if (int.is_empty() && frac.is_empty()) || frac.contains('.') {
            return Err(format!("invalid number `{}`", number));
        }
        let int: u128 = if int.is_empty() { 0 } else { int.parse().map_err(|_| out_of_range())? };
        let mut nanos = int.checked_mul(scale).ok_or_else(out_of_range)?;
        if !frac.is_empty() {
            // Keeps `digits * scale` within u128.
            let frac = &frac[..frac.len().min(18)];
            let digits: u128 = frac.parse().map_err(|_| out_of_range())?;
            nanos = nanos
                .checked_add(digits * scale / 10u128.pow(frac.len() as u32))
                .ok_or_else(out_of_range)?;
        }
        total = total.checked_add(nanos).ok_or_else(out_of_range)?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| out_of_range())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn out_of_range() -> String {
    "duration out of range".to_string()
}
