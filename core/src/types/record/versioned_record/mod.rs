use redb::TypeName;
pub use v2 as latest_record;

pub mod v1;
pub mod v2;

pub trait RecordVariant {
    const VERSION: u8;
}

#[derive(Debug, Clone)]
pub enum VersionedRecord {
    V1(v1::Record),
    V2(v2::Record),
}

impl VersionedRecord {
    pub fn into_latest(self) -> latest_record::Record {
        match self {
            VersionedRecord::V1(v) => v.into(),
            VersionedRecord::V2(v) => v,
        }
    }
}

impl redb::Value for VersionedRecord {
    type SelfType<'a> = VersionedRecord;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        let (version, data) = data.split_first().expect("empty data");
        match *version {
            v1::Record::VERSION => {
                let v1 = postcard::from_bytes::<v1::Record>(data).expect("invalid record");
                VersionedRecord::V1(v1)
            }
            v2::Record::VERSION => {
                let v2 = postcard::from_bytes::<v2::Record>(data).expect("invalid record");
                VersionedRecord::V2(v2)
            }
            version => panic!("unsupported version: {}", version),
        }
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        match value {
            VersionedRecord::V1(v1) => postcard::to_extend(v1, vec![v1::Record::VERSION]).unwrap(),
            VersionedRecord::V2(v2) => postcard::to_extend(v2, vec![v2::Record::VERSION]).unwrap(),
        }
    }

    fn type_name() -> TypeName {
        TypeName::new("worldfeel::Record")
    }
}
