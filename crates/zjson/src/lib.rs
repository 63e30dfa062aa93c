//! A low-allocation JSON encoder and decoder driven by hand-written code.
//!
//! `zjson` does not derive anything. Types describe their own layout by
//! implementing [`ObjectEncoder`] / [`ArrayEncoder`] for writing and
//! [`ObjectDecoder`] for reading, and call typed writers and readers
//! ([`Encoder::u16_field_opt`], [`Decoder::u16`], ...) field by field.
//!
//! The wire format is JSON with a few fixed conventions shared with existing
//! producers and consumers:
//!
//! - timestamps are quoted `YYYYMMDDHHMMSS[.fff]Z` strings,
//! - "int bools" are the bare tokens `1` and `0`,
//! - strings escape only `\\`, `\"`, `\n`, `\r` and `\t`,
//! - `*_field_opt` writers omit zero values, so decoders treat absent fields
//!   as zero.
//!
//! Encoder buffers and decoder scratch buffers come from process-wide pools
//! ([`acquire_encoder`], [`acquire_decoder`]) and return to them on drop.
//!
//! ```rust
//! use zjson::{DecodeError, Decoder, Encoder, ObjectDecoder, ObjectEncoder};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Spin {
//!     round: u32,
//!     win: bool,
//!     symbols: Vec<u8>,
//! }
//!
//! impl ObjectEncoder for Spin {
//!     fn is_empty(&self) -> bool {
//!         false
//!     }
//!
//!     fn encode_fields(&self, enc: &mut Encoder) {
//!         enc.u32_field_opt("round", self.round);
//!         enc.int_bool_field_opt("win", self.win);
//!         enc.array_field_opt("symbols", Some(&self.symbols));
//!     }
//! }
//!
//! impl ObjectDecoder for Spin {
//!     fn decode_field(&mut self, dec: &mut Decoder<'_>, key: &[u8]) -> Result<(), DecodeError> {
//!         match key {
//!             b"round" => self.round = dec.u32()?,
//!             b"win" => self.win = dec.int_bool()?,
//!             b"symbols" => dec.values(&mut self.symbols)?,
//!             _ => return Err(DecodeError::unknown_field("Spin", key)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let spin = Spin { round: 7, win: true, symbols: vec![3, 1, 4] };
//! let mut enc = zjson::acquire_encoder(128);
//! enc.object(&spin);
//! assert_eq!(enc.bytes(), br#"{"round":7,"win":1,"symbols":[3,1,4]}"#);
//!
//! let mut decoded = Spin::default();
//! zjson::acquire_decoder(enc.bytes()).object(&mut decoded)?;
//! assert_eq!(decoded, spin);
//! # Ok::<(), DecodeError>(())
//! ```

mod decoder;
mod encoder;
mod error;
mod float;
mod options;
mod pool;
mod size;
mod timestamp;
mod values;

#[cfg(any(test, feature = "fuzzing", feature = "bench"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use decoder::{Decoder, ObjectDecoder};
pub use encoder::{ArrayEncoder, Encoder, ObjectEncoder};
pub use error::{DecodeError, PoolError};
pub use float::FloatFormat;
pub use options::PoolOptions;
pub use pool::{acquire_decoder, acquire_encoder, configure_pools};
pub use size::{DEFAULT_SCRATCH_CAPACITY, fix_buffer_size};
pub use values::{ArrayElement, Objects};
