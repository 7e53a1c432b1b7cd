use super::bitstring::BitString;
use super::error::{QRError, QRResult};

// Source data
//------------------------------------------------------------------------------

/// Input accepted by the encoder. Anything outside these shapes is an
/// [`UnsupportedDataType`](QRError::UnsupportedDataType).
#[derive(Debug, Copy, Clone)]
pub enum Source<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Number(u64),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Source<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Self::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Source<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<u64> for Source<'_> {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

// Encoding modes
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl Mode {
    fn indicator(self) -> u32 {
        match self {
            Self::Numeric => 0b0001,
            Self::Alphanumeric => 0b0010,
            Self::Byte => 0b0100,
        }
    }

    /// Width of the character count field per capacity tier.
    fn count_bits(self, tier: usize) -> usize {
        match self {
            Self::Numeric => [10, 12, 14][tier],
            Self::Alphanumeric => [9, 11, 13][tier],
            Self::Byte => [8, 16, 16][tier],
        }
    }

    /// Byte ceiling beyond which the payload cannot fit any version.
    fn byte_ceiling(self) -> usize {
        match self {
            Self::Numeric => 7089,
            Self::Alphanumeric => 4296,
            Self::Byte => 2953,
        }
    }
}

static ALPHANUM: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

fn alphanum_value(b: u8) -> u32 {
    ALPHANUM.iter().position(|&c| c == b).expect("Character outside alphanumeric set") as u32
}

// Encoded payload
//------------------------------------------------------------------------------

/// Parallel bit streams for the three capacity tiers (versions 1-9, 10-26,
/// 27-40). A lower tier is present only when its character count field can
/// represent the content length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub v1: Option<BitString>,
    pub v10: Option<BitString>,
    pub v27: BitString,
}

impl EncodedPayload {
    fn pack(mode: Mode, count: usize, content: &BitString) -> Self {
        let tier = |t: usize| {
            let mut bs = BitString::new();
            bs.push_bits(mode.indicator(), 4);
            bs.push_bits(count as u32, mode.count_bits(t));
            bs.extend(content);
            bs
        };

        Self {
            v1: (count < 1 << mode.count_bits(0)).then(|| tier(0)),
            v10: (count < 1 << mode.count_bits(1)).then(|| tier(1)),
            v27: tier(2),
        }
    }

    /// Tier-wise concatenation for URL mode. A tier survives only when both
    /// halves carry it.
    fn concat(mut self, tail: EncodedPayload) -> Self {
        self.v27.extend(&tail.v27);
        let join = |a: Option<BitString>, b: Option<BitString>| {
            let (mut a, b) = (a?, b?);
            a.extend(&b);
            Some(a)
        };
        Self { v1: join(self.v1, tail.v1), v10: join(self.v10, tail.v10), v27: self.v27 }
    }
}

// Encoder
//------------------------------------------------------------------------------

/// Classifies the input and bit-packs it under the densest applicable mode.
pub fn encode<'a>(data: impl Into<Source<'a>>, parse_url: bool) -> QRResult<EncodedPayload> {
    match data.into() {
        Source::Text(s) => encode_str(s, s.as_bytes(), parse_url),
        Source::Number(n) => {
            let s = n.to_string();
            encode_str(&s, s.as_bytes(), parse_url)
        }
        Source::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => encode_str(s, b, parse_url),
            Err(_) => encode_bytes(b),
        },
    }
}

fn encode_str(s: &str, bytes: &[u8], parse_url: bool) -> QRResult<EncodedPayload> {
    if bytes.is_empty() {
        return Err(QRError::EmptyData);
    }

    if bytes.iter().all(u8::is_ascii_digit) {
        if bytes.len() > Mode::Numeric.byte_ceiling() {
            return Err(QRError::DataTooLarge);
        }
        return Ok(encode_numeric(s));
    }

    if bytes.iter().all(|b| ALPHANUM.contains(b)) {
        if bytes.len() > Mode::Alphanumeric.byte_ceiling() {
            return Err(QRError::DataTooLarge);
        }
        return Ok(encode_alphanumeric(s));
    }

    if parse_url && is_url(bytes) {
        return encode_url(s);
    }

    encode_bytes(bytes)
}

fn is_url(bytes: &[u8]) -> bool {
    let lower: Vec<u8> = bytes.iter().take(6).map(u8::to_ascii_lowercase).collect();
    lower.starts_with(b"https:") || lower.starts_with(b"http:")
}

/// Numeric mode: 3 digits per 10 bits, remainders of 2/1 digits in 7/4 bits.
fn encode_numeric(s: &str) -> EncodedPayload {
    let mut content = BitString::new();
    for chunk in s.as_bytes().chunks(3) {
        let size = (chunk.len() * 10 + 2) / 3;
        let value = chunk.iter().fold(0u32, |v, b| v * 10 + (b - b'0') as u32);
        content.push_bits(value, size);
    }
    EncodedPayload::pack(Mode::Numeric, s.len(), &content)
}

/// Alphanumeric mode: char pairs in 11 bits, a leftover char in 6.
fn encode_alphanumeric(s: &str) -> EncodedPayload {
    let mut content = BitString::new();
    for chunk in s.as_bytes().chunks(2) {
        match chunk {
            [a, b] => content.push_bits(alphanum_value(*a) * 45 + alphanum_value(*b), 11),
            [a] => content.push_bits(alphanum_value(*a), 6),
            _ => unreachable!(),
        }
    }
    EncodedPayload::pack(Mode::Alphanumeric, s.len(), &content)
}

/// Byte mode: raw 8-bit packing.
fn encode_bytes(bytes: &[u8]) -> QRResult<EncodedPayload> {
    if bytes.is_empty() {
        return Err(QRError::EmptyData);
    }
    if bytes.len() > Mode::Byte.byte_ceiling() {
        return Err(QRError::DataTooLarge);
    }

    let mut content = BitString::new();
    for &b in bytes {
        content.push_bits(b as u32, 8);
    }
    Ok(EncodedPayload::pack(Mode::Byte, bytes.len(), &content))
}

/// URL mode: scheme, host and the trailing slash are re-encoded upper-cased
/// (usually landing in alphanumeric mode); the rest of the path is encoded
/// independently and appended tier by tier.
fn encode_url(s: &str) -> QRResult<EncodedPayload> {
    // First '/' past the scheme's "//", or the whole string
    let slash = s
        .as_bytes()
        .iter()
        .skip(8)
        .position(|&b| b == b'/')
        .map(|p| p + 9)
        .unwrap_or(s.len());

    let head = s[..slash].to_uppercase();
    let encoded = encode_str(&head, head.as_bytes(), false)?;

    if slash >= s.len() {
        return Ok(encoded);
    }

    let path = &s[slash..];
    let path_encoded = encode_str(path, path.as_bytes(), false)?;
    Ok(encoded.concat(path_encoded))
}
