//! Boundary extension for neighbourhood reads that leave the source.

/// Maps a possibly out-of-range coordinate into `[0, limit)` by half-sample
/// symmetric mirroring: `-1 -> 0`, `-2 -> 1`, `limit -> limit - 1`.
///
/// The pattern repeats with period `2 * limit`, so coordinates arbitrarily far
/// outside the image still resolve. Returns `None` only for `limit == 0`.
#[inline]
pub fn mirror_index(coord: i64, limit: usize) -> Option<usize> {
    if limit == 0 {
        return None;
    }
    let limit = limit as i64;
    let period = 2 * limit;
    let folded = coord.rem_euclid(period);
    let mirrored = if folded >= limit {
        period - folded - 1
    } else {
        folded
    };
    Some(mirrored as usize)
}

#[cfg(test)]
mod tests {
    use super::mirror_index;

    #[test]
    fn mirror_len1_len2_len5() {
        assert_eq!(mirror_index(3, 0), None);

        for i in -8..=8 {
            assert_eq!(mirror_index(i, 1), Some(0));
        }

        let expected_len2 = [0, 1, 1, 0, 0, 1, 1, 0, 0];
        for (coord, expected) in (-4..=4).zip(expected_len2) {
            assert_eq!(mirror_index(coord, 2), Some(expected), "coord {coord}");
        }

        let cases_len5 = [
            (-7, 3),
            (-6, 4),
            (-5, 4),
            (-3, 2),
            (-2, 1),
            (-1, 0),
            (0, 0),
            (4, 4),
            (5, 4),
            (6, 3),
            (9, 0),
            (10, 0),
            (11, 1),
        ];
        for (coord, expected) in cases_len5 {
            assert_eq!(mirror_index(coord, 5), Some(expected), "coord {coord}");
        }
    }
}
