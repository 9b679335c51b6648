use std::fmt;
use std::fs::File;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use url::Url;

use crate::value::contract::{ConversionError, FromToken};

impl FromToken for String {
    const EXPECTED: &'static str = "a string";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        Ok(token.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FromToken for bool {
    const EXPECTED: &'static str = "one of 'true', 'false', '1', '0'";
    const IS_BOOL: bool = true;

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        match token {
            // An empty token means the flag was specified without a value.
            "" | "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConversionError::new(token, Self::EXPECTED)),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! numeric_from_token {
    ($($t:ty => $expected:literal),+ $(,)?) => {
        $(
            impl FromToken for $t {
                const EXPECTED: &'static str = $expected;

                fn from_token(token: &str) -> Result<Self, ConversionError> {
                    token
                        .parse::<$t>()
                        .map_err(|_| ConversionError::new(token, Self::EXPECTED))
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

numeric_from_token!(
    i32 => "a 32-bit integer",
    i64 => "a 64-bit integer",
    u32 => "a 32-bit unsigned integer",
    u64 => "a 64-bit unsigned integer",
    usize => "an unsigned integer",
    f32 => "a 32-bit float",
    f64 => "a 64-bit float",
);

const DURATION_EXPECTED: &str = "a duration with unit suffix (ex: '250ms', '5s', '1h30m')";

// Nanoseconds per unit, largest first (render decomposes in this order).
const DURATION_UNITS: &[(&str, u128)] = &[
    ("h", 3_600_000_000_000),
    ("m", 60_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

impl FromToken for Duration {
    const EXPECTED: &'static str = DURATION_EXPECTED;

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        if token.is_empty() {
            return Err(ConversionError::new(token, Self::EXPECTED));
        }

        let mut nanos: u128 = 0;
        let mut rest = token;

        // A duration is one or more <number><unit> segments, ex: '1h30m'.
        while !rest.is_empty() {
            let split = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .ok_or_else(|| ConversionError::new(token, Self::EXPECTED))?;

            if split == 0 {
                return Err(ConversionError::new(token, Self::EXPECTED));
            }

            let (number, tail) = rest.split_at(split);
            let value: f64 = number
                .parse()
                .map_err(|_| ConversionError::new(token, Self::EXPECTED))?;
            let (unit, tail) = match tail {
                t if t.starts_with("ns") => (1u128, &t[2..]),
                t if t.starts_with("us") => (1_000, &t[2..]),
                t if t.starts_with("ms") => (1_000_000, &t[2..]),
                t if t.starts_with('s') => (1_000_000_000, &t[1..]),
                t if t.starts_with('m') => (60_000_000_000, &t[1..]),
                t if t.starts_with('h') => (3_600_000_000_000, &t[1..]),
                _ => return Err(ConversionError::new(token, Self::EXPECTED)),
            };
            let segment = value * unit as f64;

            // Each segment must fit the u64 nanosecond range on its own.
            if segment > u64::MAX as f64 {
                return Err(ConversionError::new(token, Self::EXPECTED));
            }

            nanos += segment.round() as u128;
            rest = tail;
        }

        // The segment total may still exceed the range; reject, never wrap.
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .map_err(|_| ConversionError::new(token, Self::EXPECTED))
    }

    fn render(&self) -> String {
        if self.is_zero() {
            return "0s".to_string();
        }

        let mut out = String::new();
        let mut nanos = self.as_nanos();

        for (suffix, size) in DURATION_UNITS {
            let count = nanos / size;

            if count > 0 {
                out.push_str(&format!("{count}{suffix}"));
                nanos %= size;
            }
        }

        out
    }
}

impl FromToken for IpAddr {
    const EXPECTED: &'static str = "an IP address";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        token
            .parse()
            .map_err(|_| ConversionError::new(token, Self::EXPECTED))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl FromToken for Url {
    const EXPECTED: &'static str = "a URL";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        Url::parse(token).map_err(|_| ConversionError::new(token, Self::EXPECTED))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// A TCP `host:port` address.
/// The port splits off the last `:`, so IPv6 literal hosts remain intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromToken for HostPort {
    const EXPECTED: &'static str = "a 'host:port' address";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        let (host, port) = token
            .rsplit_once(':')
            .ok_or_else(|| ConversionError::new(token, Self::EXPECTED))?;

        if host.is_empty() {
            return Err(ConversionError::new(token, Self::EXPECTED));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| ConversionError::new(token, Self::EXPECTED))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// A path validated against the filesystem at conversion time.
/// Conversion fails when the path is absent or names a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFile(PathBuf);

impl ExistingFile {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl FromToken for ExistingFile {
    const EXPECTED: &'static str = "a path to an existing file";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        match std::fs::metadata(token) {
            Ok(metadata) if !metadata.is_dir() => Ok(Self(PathBuf::from(token))),
            _ => Err(ConversionError::new(token, Self::EXPECTED)),
        }
    }

    fn render(&self) -> String {
        self.0.display().to_string()
    }
}

/// A path validated to name an existing directory at conversion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingDir(PathBuf);

impl ExistingDir {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl FromToken for ExistingDir {
    const EXPECTED: &'static str = "a path to an existing directory";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        match std::fs::metadata(token) {
            Ok(metadata) if metadata.is_dir() => Ok(Self(PathBuf::from(token))),
            _ => Err(ConversionError::new(token, Self::EXPECTED)),
        }
    }

    fn render(&self) -> String {
        self.0.display().to_string()
    }
}

/// A file validated and opened (read-only) at conversion time.
#[derive(Debug, Clone)]
pub struct OpenedFile {
    path: PathBuf,
    file: Rc<File>,
}

impl OpenedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

impl FromToken for OpenedFile {
    const EXPECTED: &'static str = "a path to an openable file";

    fn from_token(token: &str) -> Result<Self, ConversionError> {
        match File::open(token) {
            Ok(file) => Ok(Self {
                path: PathBuf::from(token),
                file: Rc::new(file),
            }),
            Err(_) => Err(ConversionError::new(token, Self::EXPECTED)),
        }
    }

    fn render(&self) -> String {
        self.path.display().to_string()
    }
}
