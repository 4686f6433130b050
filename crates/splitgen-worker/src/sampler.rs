//! Variant sampling.
//!
//! Each variant pairs the full primary track with a random window of the
//! secondary track of the same length. Offsets are drawn uniformly from
//! `[0, D2 - D1]` with replacement, so duplicates are possible.

use rand::Rng;
use splitgen_media::{CompositionPlan, FramedTrack};

use crate::error::{WorkerError, WorkerResult};

/// Draw a subclip start so that `[start, start + primary)` fits inside the secondary.
pub fn sample_offset<R: Rng + ?Sized>(
    rng: &mut R,
    primary_duration: f64,
    secondary_duration: f64,
) -> WorkerResult<f64> {
    let span = offset_span(primary_duration, secondary_duration)?;
    if span == 0.0 {
        return Ok(0.0);
    }
    Ok(rng.random_range(0.0..=span))
}

/// Width of the offset range, failing when the secondary is shorter than the primary.
pub fn offset_span(primary_duration: f64, secondary_duration: f64) -> WorkerResult<f64> {
    let span = secondary_duration - primary_duration;
    if !span.is_finite() || span < 0.0 {
        return Err(WorkerError::configuration(format!(
            "secondary video ({:.3}s) is shorter than primary video ({:.3}s)",
            secondary_duration, primary_duration
        )));
    }
    Ok(span)
}

/// Produces composition plans for one framed primary/secondary pair.
#[derive(Debug, Clone)]
pub struct VariantSampler {
    primary: FramedTrack,
    secondary: FramedTrack,
}

impl VariantSampler {
    /// Fails with a configuration error unless the secondary covers the primary.
    pub fn new(primary: FramedTrack, secondary: FramedTrack) -> WorkerResult<Self> {
        offset_span(primary.duration, secondary.duration)?;
        Ok(Self { primary, secondary })
    }

    /// Draw an offset and plan the variant for it.
    pub fn next_plan<R: Rng + ?Sized>(&self, rng: &mut R) -> WorkerResult<CompositionPlan> {
        let offset = sample_offset(rng, self.primary.duration, self.secondary.duration)?;
        CompositionPlan::new(&self.primary, &self.secondary, offset)
            .map_err(|e| WorkerError::configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use splitgen_media::{FramePlan, HorizontalFit};
    use splitgen_models::Dimensions;
    use std::path::PathBuf;

    fn track(duration: f64) -> FramedTrack {
        let size = Dimensions::new(1080, 768);
        FramedTrack {
            path: PathBuf::from("in.mp4"),
            plan: FramePlan {
                source: size,
                resized: size,
                fit: None::<HorizontalFit>,
                keep_audio: true,
            },
            duration,
            fps: 30,
            has_audio: true,
        }
    }

    #[test]
    fn test_offsets_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let offset = sample_offset(&mut rng, 10.0, 25.0).unwrap();
            assert!((0.0..=15.0).contains(&offset));
            assert!(offset + 10.0 <= 25.0);
        }
    }

    #[test]
    fn test_equal_durations_give_zero_offset() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_offset(&mut rng, 12.5, 12.5).unwrap(), 0.0);
    }

    #[test]
    fn test_short_secondary_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_offset(&mut rng, 20.0, 10.0).unwrap_err();
        assert!(matches!(err, WorkerError::Configuration(_)));

        assert!(VariantSampler::new(track(20.0), track(10.0)).is_err());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let sampler = VariantSampler::new(track(5.0), track(60.0)).unwrap();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..5)
                .map(|_| sampler.next_plan(&mut rng).unwrap().secondary_start)
                .collect::<Vec<_>>()
        };

        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn test_plan_uses_primary_duration() {
        let sampler = VariantSampler::new(track(5.0), track(60.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let plan = sampler.next_plan(&mut rng).unwrap();

        assert_eq!(plan.duration, 5.0);
        assert!(plan.secondary_end() <= 60.0);
    }
}
