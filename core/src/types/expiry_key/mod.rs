use crate::types::record::RecordId;
use redb::TypeName;
use std::cmp::Ordering;
use std::time::{Duration, SystemTime};

const ENCODED_LEN: usize = 8 + 4 + 8;

/// Ordered `(expires_at, id)` pair. Encoded big-endian so that byte order
/// matches expiry order and range scans can stop at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryKey {
    pub expires_at: SystemTime,
    pub id: RecordId,
}

fn extract_duration(data: &[u8]) -> (Duration, &[u8]) {
    let (secs, data) = data.split_first_chunk::<8>().unwrap();
    let secs = u64::from_be_bytes(*secs);
    let (nanos, data) = data.split_first_chunk::<4>().unwrap();
    let nanos = u32::from_be_bytes(*nanos);

    (Duration::new(secs, nanos), data)
}

fn extract_id(data: &[u8]) -> RecordId {
    let (id, _) = data.split_first_chunk::<8>().unwrap();
    u64::from_be_bytes(*id)
}

impl redb::Key for ExpiryKey {
    fn compare(data1: &[u8], data2: &[u8]) -> Ordering {
        let (data1_duration, data1) = extract_duration(data1);
        let (data2_duration, data2) = extract_duration(data2);

        data1_duration
            .cmp(&data2_duration)
            .then_with(|| extract_id(data1).cmp(&extract_id(data2)))
    }
}

impl redb::Value for ExpiryKey {
    type SelfType<'a> = ExpiryKey;
    type AsBytes<'a> = [u8; ENCODED_LEN];

    fn fixed_width() -> Option<usize> {
        Some(ENCODED_LEN)
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        let (since_epoch, data) = extract_duration(data);

        ExpiryKey {
            expires_at: SystemTime::UNIX_EPOCH + since_epoch,
            id: extract_id(data),
        }
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        let since_epoch = value
            .expires_at
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();

        let mut bytes = [0u8; ENCODED_LEN];
        bytes[..8].copy_from_slice(&since_epoch.as_secs().to_be_bytes());
        bytes[8..12].copy_from_slice(&since_epoch.subsec_nanos().to_be_bytes());
        bytes[12..].copy_from_slice(&value.id.to_be_bytes());
        bytes
    }

    fn type_name() -> TypeName {
        TypeName::new("worldfeel::ExpiryKey")
    }
}
