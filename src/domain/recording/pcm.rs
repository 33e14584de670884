//! Raw PCM sample encoding

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::domain::error::InvalidChoiceError;

use super::sample_rate::BYTES_PER_SAMPLE;

/// Byte order of each 16-bit sample in the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Network order, as written by Java's `DataOutputStream`
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }

    pub const fn encode(&self, sample: i16) -> [u8; BYTES_PER_SAMPLE] {
        match self {
            Self::Big => sample.to_be_bytes(),
            Self::Little => sample.to_le_bytes(),
        }
    }

    pub const fn decode(&self, bytes: [u8; BYTES_PER_SAMPLE]) -> i16 {
        match self {
            Self::Big => i16::from_be_bytes(bytes),
            Self::Little => i16::from_le_bytes(bytes),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = InvalidChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "big" | "be" | "big-endian" => Ok(Self::Big),
            "little" | "le" | "little-endian" => Ok(Self::Little),
            _ => Err(InvalidChoiceError {
                what: "byte order",
                input: s.to_string(),
                valid: "big, little",
            }),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequential headerless PCM sink. Mono, signed 16-bit.
///
/// Samples are written one at a time; callers that need throughput should
/// hand in a buffered writer.
pub struct PcmWriter<W: Write> {
    inner: W,
    order: ByteOrder,
    samples: u64,
}

impl<W: Write> PcmWriter<W> {
    pub fn new(inner: W, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            samples: 0,
        }
    }

    /// Append one sample
    pub fn write_sample(&mut self, sample: i16) -> io::Result<()> {
        self.inner.write_all(&self.order.encode(sample))?;
        self.samples += 1;
        Ok(())
    }

    /// Samples successfully written so far
    pub fn samples_written(&self) -> u64 {
        self.samples
    }

    pub fn bytes_written(&self) -> u64 {
        self.samples * BYTES_PER_SAMPLE as u64
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Decode a raw PCM byte stream back into samples.
///
/// A trailing odd byte is ignored.
pub fn decode_samples(bytes: &[u8], order: ByteOrder) -> Vec<i16> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| order.decode([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn big_endian_layout() {
        let mut writer = PcmWriter::new(Vec::new(), ByteOrder::Big);
        writer.write_sample(0x0102).unwrap();
        writer.write_sample(-2).unwrap();
        assert_eq!(writer.samples_written(), 2);
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(writer.finish().unwrap(), vec![0x01, 0x02, 0xFF, 0xFE]);
    }

    #[test]
    fn little_endian_layout() {
        let mut writer = PcmWriter::new(Vec::new(), ByteOrder::Little);
        writer.write_sample(0x0102).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0x02, 0x01]);
    }

    #[test]
    fn failed_write_is_not_counted() {
        let mut writer = PcmWriter::new(BrokenPipe, ByteOrder::Big);
        let err = writer.write_sample(7).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(writer.samples_written(), 0);
    }

    #[test]
    fn decode_ignores_trailing_byte() {
        let samples = decode_samples(&[0x00, 0x05, 0x80, 0x00, 0x11], ByteOrder::Big);
        assert_eq!(samples, vec![5, i16::MIN]);
    }

    #[test]
    fn byte_order_parsing() {
        assert_eq!("BIG".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("le".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert!("middle".parse::<ByteOrder>().is_err());
        assert_eq!(ByteOrder::default().to_string(), "big");
    }
}
