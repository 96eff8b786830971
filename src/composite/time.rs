use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::codec::decode::Decoder;
use crate::codec::encode::Output;
use crate::codec::{Pack, Unpack};
use crate::internal::error::{Error, Result};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Signed nanoseconds relative to the UNIX epoch.
fn epoch_nanos(time: &SystemTime) -> Result<i64> {
    let out_of_range = || Error::CodecError(format!("time point {:?} does not fit in i64 nanoseconds", time));
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_nanos()).map_err(|_| out_of_range()),
        Err(before) => i64::try_from(before.duration().as_nanos())
            .map(|n| -n)
            .map_err(|_| out_of_range()),
    }
}

fn from_epoch_nanos(nanos: i64) -> Option<SystemTime> {
    let offset = Duration::from_nanos(nanos.unsigned_abs());
    if nanos >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}

/// i64 nanoseconds since the UNIX epoch (negative before it).
impl Pack for SystemTime {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_scalar(epoch_nanos(self)?);
        Ok(())
    }
}

impl Unpack for SystemTime {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let start = dec.position();
        if let Some(nanos) = dec.get::<i64>()? {
            match from_epoch_nanos(nanos) {
                Some(time) => *self = time,
                None => dec.reject_since(start),
            }
        }
        Ok(())
    }
}

/// u64 whole seconds followed by u32 sub-second nanoseconds.
impl Pack for Duration {
    fn pack_into<O: Output>(&self, out: &mut O) -> Result<()> {
        out.put_scalar(self.as_secs()).put_scalar(self.subsec_nanos());
        Ok(())
    }
}

impl Unpack for Duration {
    fn unpack_from(&mut self, dec: &mut Decoder<'_>) -> Result<()> {
        let mut decoded = None;
        dec.atomic(|d| {
            let start = d.position();
            let (Some(secs), Some(nanos)) = (d.get::<u64>()?, d.get::<u32>()?) else {
                return Ok(());
            };
            if nanos >= NANOS_PER_SEC {
                d.reject_since(start);
            } else {
                decoded = Some(Duration::new(secs, nanos));
            }
            Ok(())
        })?;
        if let Some(duration) = decoded {
            *self = duration;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::Status;
    use crate::codec::encode::Encoder;

    #[test]
    fn test_system_time_round_trip() {
        let times = [
            UNIX_EPOCH,
            UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789),
            UNIX_EPOCH - Duration::from_secs(86_400),
        ];
        for time in times {
            let mut enc = Encoder::new();
            enc.insert(&time).unwrap();
            assert_eq!(enc.len(), 8);
            let bytes = enc.take();
            let mut dec = Decoder::new(&bytes);
            let mut decoded = SystemTime::now();
            dec.extract(&mut decoded).unwrap();
            assert_eq!(decoded, time);
        }
    }

    #[test]
    fn test_pre_epoch_is_negative() {
        let mut enc = Encoder::new();
        enc.insert(&(UNIX_EPOCH - Duration::from_nanos(1))).unwrap();
        assert_eq!(enc.as_slice(), &[0xff; 8]);
    }

    #[test]
    fn test_duration_round_trip() {
        let mut enc = Encoder::new();
        enc.insert(&Duration::new(90, 5)).unwrap();
        assert_eq!(enc.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 90, 0, 0, 0, 5]);
        let bytes = enc.take();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.get::<Duration>().unwrap(), Some(Duration::new(90, 5)));
    }

    #[test]
    fn test_duration_with_bad_nanos_is_corrupted() {
        let mut enc = Encoder::new();
        enc.put_scalar(1u64).put_scalar(NANOS_PER_SEC);
        let bytes = enc.take();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.get::<Duration>().unwrap(), None);
        assert_eq!(dec.status(), Status::Corrupted);
        assert_eq!(dec.position(), 0);
    }
}
