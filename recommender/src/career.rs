// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Blends the career goal scores into the base scores.
///
/// The scores are summed element-wise and rescaled by their maximum, which keeps the order and
/// maps the best course to `1`. Without a positive maximum the sums are returned as they are.
pub fn adjust_for_career_goal(base_scores: &[f32], career_scores: &[f32]) -> Vec<f32> {
    debug_assert_eq!(base_scores.len(), career_scores.len());

    let mut adjusted = base_scores
        .iter()
        .zip(career_scores)
        .map(|(base, career)| base + career)
        .collect::<Vec<_>>();

    let max = adjusted.iter().copied().fold(0., f32::max);
    if max > 0. {
        for score in &mut adjusted {
            *score /= max;
        }
    }

    adjusted
}

#[cfg(test)]
mod tests {
    use xayn_test_utils::assert_approx_eq;

    use super::*;

    #[test]
    fn test_empty() {
        assert!(adjust_for_career_goal(&[], &[]).is_empty());
    }

    #[test]
    fn test_without_career_goal_rescales_base() {
        let adjusted = adjust_for_career_goal(&[0.2, 0.4, 0.1], &[0., 0., 0.]);
        assert_approx_eq!(f32, adjusted, [0.5, 1., 0.25]);
    }

    #[test]
    fn test_blend_has_maximum_one() {
        let adjusted = adjust_for_career_goal(&[0.9, 0.8, 0.], &[0.1, 0.5, 0.3]);
        assert_approx_eq!(f32, adjusted, [1. / 1.3, 1., 0.3 / 1.3]);
        assert_approx_eq!(f32, adjusted.iter().copied().fold(0., f32::max), 1.);
    }

    #[test]
    fn test_career_goal_can_change_the_order() {
        let adjusted = adjust_for_career_goal(&[0.6, 0.5], &[0., 0.4]);
        assert!(adjusted[1] > adjusted[0]);
    }

    #[test]
    fn test_all_zero_stays_unchanged() {
        assert_eq!(adjust_for_career_goal(&[0., 0.], &[0., 0.]), [0., 0.]);
    }
}
