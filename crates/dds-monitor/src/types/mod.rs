// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Flat sample types for the three monitored record kinds.
//!
//! Every type is CDR2-encoded (little-endian, natural alignment) field by
//! field in declaration order, serializes to JSON in the same order, and
//! exposes its fields to the text formatter through [`Record`].

use hdds::core::types::TypeDescriptor;
use hdds::DdsTrait;

use crate::format::FieldValue;
use crate::topics::RecordKind;

/// A sample type the monitor can print.
pub trait Record: DdsTrait + serde::Serialize {
    const KIND: RecordKind;

    /// Registered type name, `Module::Struct`.
    fn type_name() -> &'static str {
        Self::type_descriptor().type_name
    }

    /// `(name, value)` pairs in display order.
    fn fields(&self) -> Vec<(&'static str, FieldValue<'_>)>;
}

/// FNV-1a over the type name, the id the code generator assigns.
pub(crate) const fn type_id(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash: u32 = 0x811c_9dc5;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

/// Encoding cursor over the writer's scratch buffer.
pub(crate) struct CdrOut<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> CdrOut<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.pos
    }

    fn align(&mut self, alignment: usize) -> hdds::Result<()> {
        while self.pos % alignment != 0 {
            self.put(&[0])?;
        }
        Ok(())
    }

    fn put(&mut self, bytes: &[u8]) -> hdds::Result<()> {
        let end = self.pos + bytes.len();
        let dst = self
            .buf
            .get_mut(self.pos..end)
            .ok_or(hdds::Error::BufferTooSmall)?;
        dst.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Decoding cursor over a received payload.
pub(crate) struct CdrIn<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> CdrIn<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn align(&mut self, alignment: usize) -> hdds::Result<()> {
        let padding = (alignment - self.pos % alignment) % alignment;
        self.take(padding).map(|_| ())
    }

    fn take(&mut self, len: usize) -> hdds::Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(hdds::Error::SerializationError)?;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(hdds::Error::SerializationError)?;
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> hdds::Result<[u8; N]> {
        self.align(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

/// Scalar or string member of a flat record.
pub(crate) trait FlatField: Sized {
    fn encode(&self, out: &mut CdrOut<'_>) -> hdds::Result<()>;
    fn decode(input: &mut CdrIn<'_>) -> hdds::Result<Self>;
    fn value(&self) -> FieldValue<'_>;
}

macro_rules! impl_flat_scalar {
    ($($type:ty),+) => {$(
        impl FlatField for $type {
            fn encode(&self, out: &mut CdrOut<'_>) -> hdds::Result<()> {
                out.align(std::mem::size_of::<$type>())?;
                out.put(&self.to_le_bytes())
            }

            fn decode(input: &mut CdrIn<'_>) -> hdds::Result<Self> {
                Ok(<$type>::from_le_bytes(input.array()?))
            }

            fn value(&self) -> FieldValue<'_> {
                FieldValue::from(*self)
            }
        }
    )+};
}

impl_flat_scalar!(f64, f32, i16, i32, u16, u32);

impl FlatField for bool {
    fn encode(&self, out: &mut CdrOut<'_>) -> hdds::Result<()> {
        out.put(&[u8::from(*self)])
    }

    fn decode(input: &mut CdrIn<'_>) -> hdds::Result<Self> {
        match input.take(1)? {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(hdds::Error::SerializationError),
        }
    }

    fn value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

/// Length prefix (terminator included), bytes, NUL.
impl FlatField for String {
    fn encode(&self, out: &mut CdrOut<'_>) -> hdds::Result<()> {
        let len = u32::try_from(self.len() + 1).map_err(|_| hdds::Error::SerializationError)?;
        len.encode(out)?;
        out.put(self.as_bytes())?;
        out.put(&[0])
    }

    fn decode(input: &mut CdrIn<'_>) -> hdds::Result<Self> {
        let len = u32::decode(input)? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        let bytes = input.take(len)?;
        let (text, nul) = bytes.split_at(len - 1);
        if nul != [0] {
            return Err(hdds::Error::SerializationError);
        }
        String::from_utf8(text.to_vec()).map_err(|_| hdds::Error::SerializationError)
    }

    fn value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

/// Declare a flat record: the struct, its type descriptor, its CDR2 codec
/// and its field list.
macro_rules! flat_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident ($type_name:literal, $kind:expr) {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )+
        }

        impl hdds::DdsTrait for $name {
            fn type_descriptor() -> &'static hdds::core::types::TypeDescriptor {
                static DESCRIPTOR: hdds::core::types::TypeDescriptor =
                    hdds::core::types::TypeDescriptor::new(
                        super::type_id($type_name),
                        $type_name,
                        0,
                        8,
                        true,
                        &[],
                    );
                &DESCRIPTOR
            }

            fn encode_cdr2(&self, buf: &mut [u8]) -> hdds::Result<usize> {
                let mut out = super::CdrOut::new(buf);
                $( super::FlatField::encode(&self.$field, &mut out)?; )+
                Ok(out.len())
            }

            fn decode_cdr2(buf: &[u8]) -> hdds::Result<Self> {
                let mut input = super::CdrIn::new(buf);
                Ok(Self {
                    $( $field: <$ty as super::FlatField>::decode(&mut input)?, )+
                })
            }
        }

        impl super::Record for $name {
            const KIND: crate::topics::RecordKind = $kind;

            fn fields(&self) -> Vec<(&'static str, crate::format::FieldValue<'_>)> {
                vec![ $( (stringify!($field), super::FlatField::value(&self.$field)), )+ ]
            }
        }
    };
}

mod core_data;
mod intelligence;
mod messaging;

pub use core_data::FlatCoreData;
pub use intelligence::FlatIntelligence;
pub use messaging::FlatMessagingPacket;

/// Descriptor lookup for a record kind, for diagnostics.
pub fn descriptor(kind: RecordKind) -> &'static TypeDescriptor {
    match kind {
        RecordKind::CoreData => FlatCoreData::type_descriptor(),
        RecordKind::Intelligence => FlatIntelligence::type_descriptor(),
        RecordKind::Messaging => FlatMessagingPacket::type_descriptor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: DdsTrait>(sample: &T) -> Vec<u8> {
        let mut buf = vec![0u8; 4096];
        let len = sample.encode_cdr2(&mut buf).unwrap();
        buf.truncate(len);
        buf
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FlatCoreData::type_name(), "CoreData::FlatCoreData");
        assert_eq!(FlatIntelligence::type_name(), "Intelligence::FlatIntelligence");
        assert_eq!(FlatMessagingPacket::type_name(), "Messaging::FlatMessagingPacket");
        assert_eq!(descriptor(RecordKind::Messaging).type_name, "Messaging::FlatMessagingPacket");
        assert_ne!(
            descriptor(RecordKind::CoreData).type_id,
            descriptor(RecordKind::Intelligence).type_id
        );
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(FlatCoreData::default().fields().len(), 7);
        assert_eq!(FlatIntelligence::default().fields().len(), 24);
        assert_eq!(FlatMessagingPacket::default().fields().len(), 42);
    }

    #[test]
    fn test_core_data_wire_layout() {
        let sample = FlatCoreData {
            latitude: 1.0,
            longitude: 2.0,
            altitude: 3.0,
            time_seconds: -4,
            time_nano_seconds: 5,
            speed_mps: 6.0,
            orientation_degrees: 7,
        };
        let bytes = encode(&sample);
        // 8 + 8 + 4 + 4 + 4 + 4 + 2
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[16..20], &3.0f32.to_le_bytes());
        assert_eq!(&bytes[32..34], &7i16.to_le_bytes());
        assert_eq!(FlatCoreData::decode_cdr2(&bytes).unwrap(), sample);
    }

    #[test]
    fn test_messaging_survives_codec_with_strings() {
        let sample = FlatMessagingPacket {
            message_type: 2,
            sr_header_sender_id: "UAV-1".into(),
            sr_status_system_error: true,
            cd_detection_target_ID: "T-99".into(),
            cd_detection_loc_altitude: 120.5,
            tc_receiver_id: "GCS".into(),
            tc_assignment_loc_orientation_degrees: -45,
            ..Default::default()
        };
        let bytes = encode(&sample);
        assert_eq!(FlatMessagingPacket::decode_cdr2(&bytes).unwrap(), sample);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let bytes = encode(&FlatIntelligence::default());
        let err = FlatIntelligence::decode_cdr2(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, hdds::Error::SerializationError));
    }

    #[test]
    fn test_small_buffer_reported() {
        let mut buf = [0u8; 10];
        let err = FlatCoreData::default().encode_cdr2(&mut buf).unwrap_err();
        assert!(matches!(err, hdds::Error::BufferTooSmall));
    }
}
