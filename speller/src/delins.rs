use std::cmp::max;

/// How many transformations does it take to go from `str1` to `str2`?
/// Valid transformations are:
/// - delete a char
/// - insert any char
/// In the worst case, all of `str1` has to be deleted and all of `str2`
/// has to be inserted, so the score is the sum of their lengths.
/// Best case they are identical already, so 0.
///
/// The score is capped at `maxscore + 1`; callers that only rank close
/// matches don't need the exact distance of far ones.
pub fn delins(str1: &[char], str2: &[char], maxscore: usize) -> usize {
    let total = str1.len() + str2.len();
    // The length difference alone costs this much.
    if str1.len().abs_diff(str2.len()) > maxscore {
        return maxscore + 1;
    }

    // Every char not in the longest common subsequence of the two
    // strings has to be deleted from one side or inserted on the other.
    let mut prev = vec![0usize; str2.len() + 1];
    let mut cur = vec![0usize; str2.len() + 1];
    for c1 in str1 {
        for (j, c2) in str2.iter().enumerate() {
            cur[j + 1] = if c1 == c2 {
                prev[j] + 1
            } else {
                max(prev[j + 1], cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    let score = total - 2 * prev[str2.len()];
    score.min(maxscore + 1)
}
