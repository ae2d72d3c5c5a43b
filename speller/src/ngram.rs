/// Calculate a score for the similarity between `word1` and `word2`.
/// `nmax` is a bound on how large chunks should be considered for similarity.
///
/// Every pair of equal chunks of length `n` adds `n` to the score.
pub fn ngram(nmax: usize, word1: &[char], word2: &[char]) -> usize {
    // n = 1 is a plain count of equal char pairs
    let mut score = word1
        .iter()
        .map(|c1| word2.iter().filter(|c2| c1 == *c2).count())
        .sum::<usize>();
    if nmax == 1 || score <= 1 {
        return score;
    }

    for n in 2..=nmax {
        if n > word1.len() || n > word2.len() {
            break;
        }
        let nscore = word1
            .windows(n)
            .map(|w1| word2.windows(n).filter(|w2| w1 == *w2).count())
            .sum::<usize>();
        score += nscore * n;
        if nscore <= 1 {
            // A single hit of this size means there are no longer hits
            break;
        }
    }

    score
}
