use vodca::{AsRefln, Fromln};

use crate::entity::Rating;

#[derive(Debug, Clone, Copy, Default, PartialEq, Fromln, AsRefln)]
pub struct AverageRating(f64);

impl AverageRating {
    pub fn new(rating: impl Into<f64>) -> Self {
        Self(rating.into())
    }

    /// Unweighted mean of `ratings`, or `None` when there is nothing to average.
    pub fn from_ratings<'a>(ratings: impl IntoIterator<Item = &'a Rating>) -> Option<Self> {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_i64, 0_u32), |(sum, count), rating| {
                (sum + i64::from(*rating.as_ref()), count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(Self(sum as f64 / f64::from(count)))
    }
}

#[cfg(test)]
mod test {
    use super::AverageRating;
    use crate::entity::Rating;

    fn ratings(values: &[i32]) -> Vec<Rating> {
        values.iter().copied().map(Rating::new).collect()
    }

    #[test]
    fn empty_has_no_average() {
        assert_eq!(AverageRating::from_ratings(&ratings(&[])), None);
    }

    #[test]
    fn mean_of_ratings() {
        let average = AverageRating::from_ratings(&ratings(&[3, 5])).map(f64::from);
        assert_eq!(average, Some(4.0));

        let average = AverageRating::from_ratings(&ratings(&[1, 2, 2]))
            .map(f64::from)
            .unwrap_or_default();
        assert!((average - 5.0 / 3.0).abs() < f64::EPSILON);
    }
}
