use glam::{Quat, Vec3};
use ossein_core::{OsseinError, Result};

use crate::values::Interpolatable;

/// How many brackets past the cached one are checked before falling back
/// to a binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// A timestamped sample. `time_stamp` is in ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub value: T,
    pub time_stamp: f32,
}

impl<T> Keyframe<T> {
    #[inline]
    pub const fn new(time_stamp: f32, value: T) -> Self {
        Self { value, time_stamp }
    }
}

pub type KeyPosition = Keyframe<Vec3>;
pub type KeyRotation = Keyframe<Quat>;
pub type KeyScale = Keyframe<Vec3>;

/// Remembers the last bracket found in a track so playback moving forward
/// resolves in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// Normalized position of `time` between two keyframe timestamps.
///
/// Clamped to `[0, 1]`. A zero-length interval yields 0.
#[inline]
#[must_use]
pub fn scale_factor(last_time_stamp: f32, next_time_stamp: f32, time: f32) -> f32 {
    let span = next_time_stamp - last_time_stamp;
    if span <= f32::EPSILON {
        return 0.0;
    }
    ((time - last_time_stamp) / span).clamp(0.0, 1.0)
}

/// An ordered keyframe sequence for one component of a joint transform.
#[derive(Debug, Clone)]
pub struct Track<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T: Interpolatable> Track<T> {
    /// Builds a track, sorting the keys by timestamp if needed.
    #[must_use]
    pub fn new(mut keys: Vec<Keyframe<T>>) -> Self {
        if !keys.is_sorted_by(|a, b| a.time_stamp <= b.time_stamp) {
            log::debug!("Sorting {} unordered keyframes", keys.len());
            keys.sort_by(|a, b| a.time_stamp.total_cmp(&b.time_stamp));
        }
        Self { keys }
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Timestamp of the last key, if any.
    #[must_use]
    pub fn end_time(&self) -> Option<f32> {
        self.keys.last().map(|k| k.time_stamp)
    }

    /// Index of the last key whose successor's timestamp exceeds `time`.
    ///
    /// Tracks with fewer than two keys always answer 0. Fails when `time`
    /// is at or past the last timestamp.
    pub fn key_index(&self, time: f32) -> Result<usize> {
        if self.keys.len() < 2 {
            return Ok(0);
        }
        self.check_in_range(time)?;
        Ok(self.search(time))
    }

    /// Same answer as [`key_index`](Self::key_index), starting from the
    /// bracket cached in `cursor`.
    pub fn key_index_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Result<usize> {
        let len = self.keys.len();
        if len < 2 {
            return Ok(0);
        }
        self.check_in_range(time)?;

        // A stale cursor from another track is clamped rather than trusted.
        let start = cursor.last_index.min(len - 2);

        let local = if time >= self.keys[start].time_stamp {
            let end = (start + MAX_SCAN_OFFSET + 1).min(len - 1);
            (start..end).find(|&i| time < self.keys[i + 1].time_stamp)
        } else {
            None
        };

        let index = local.unwrap_or_else(|| self.search(time));
        cursor.last_index = index;
        Ok(index)
    }

    /// Samples the track at `time` (in ticks).
    pub fn sample(&self, time: f32) -> Result<T> {
        match self.keys.as_slice() {
            [] => Ok(T::IDENTITY),
            [only] => Ok(only.value.settle()),
            _ => {
                let index = self.key_index(time)?;
                Ok(self.blend(index, time))
            }
        }
    }

    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Result<T> {
        match self.keys.as_slice() {
            [] => Ok(T::IDENTITY),
            [only] => Ok(only.value.settle()),
            _ => {
                let index = self.key_index_with_cursor(time, cursor)?;
                Ok(self.blend(index, time))
            }
        }
    }

    fn check_in_range(&self, time: f32) -> Result<()> {
        let last = self.keys[self.keys.len() - 1].time_stamp;
        if time >= last {
            return Err(OsseinError::KeyframeOutOfRange { time, last });
        }
        Ok(())
    }

    fn search(&self, time: f32) -> usize {
        // partition_point yields the first key strictly after `time`
        self.keys
            .partition_point(|k| k.time_stamp <= time)
            .saturating_sub(1)
    }

    fn blend(&self, index: usize, time: f32) -> T {
        let k0 = &self.keys[index];
        let k1 = &self.keys[index + 1];
        let t = scale_factor(k0.time_stamp, k1.time_stamp, time);
        T::interpolate_linear(k0.value, k1.value, t)
    }
}
