use sprs::CsVec;

/// Euclidean length of a sparse vector
pub fn magnitude(vector: &CsVec<f64>) -> f64 {
    vector.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
}

/// Cosine of the angle between two vectors of the same space.
///
/// Defined as 0 when either side has zero magnitude. With non-negative weights
/// the result lies in [0, 1]; it is clamped there to absorb rounding.
pub fn cosine_similarity(a: &CsVec<f64>, b: &CsVec<f64>) -> f64 {
    cosine_with_norms(a, magnitude(a), b, magnitude(b))
}

fn cosine_with_norms(a: &CsVec<f64>, norm_a: f64, b: &CsVec<f64>, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Dense, symmetric N×N matrix of pairwise cosine similarities.
///
/// Fully materialized at construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes every pair once from the upper triangle and mirrors it.
    ///
    /// The diagonal is 1 for vectors with any weight and 0 for zero vectors.
    pub fn from_vectors(vectors: &[CsVec<f64>]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(magnitude).collect();
        let mut scores = vec![0.0; size * size];

        for i in 0..size {
            scores[i * size + i] = if norms[i] > 0.0 { 1.0 } else { 0.0 };
            for j in (i + 1)..size {
                let score = cosine_with_norms(&vectors[i], norms[i], &vectors[j], norms[j]);
                scores[i * size + j] = score;
                scores[j * size + i] = score;
            }
        }

        Self { size, scores }
    }

    /// Number of items (rows and columns)
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.scores[i * self.size + j])
        } else {
            None
        }
    }

    /// Similarities of item `i` to every item, in catalog order
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.scores[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::vectorizer::VectorSpace;

    fn matrix_for(documents: &[&str]) -> SimilarityMatrix {
        let space = VectorSpace::fit_transform(documents).unwrap();
        SimilarityMatrix::from_vectors(space.vectors())
    }

    #[test]
    fn test_cosine_similarity_of_orthogonal_vectors() {
        let a = CsVec::new(3, vec![0], vec![1.0]);
        let b = CsVec::new(3, vec![2], vec![4.0]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_ignores_magnitude() {
        let a = CsVec::new(3, vec![0, 1], vec![1.0, 2.0]);
        let b = CsVec::new(3, vec![0, 1], vec![2.0, 4.0]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_with_zero_vector() {
        let a = CsVec::new(2, vec![0], vec![1.0]);
        let zero: CsVec<f64> = CsVec::new(2, vec![], vec![]);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_matrix_is_symmetric_with_bounded_entries() {
        let matrix = matrix_for(&[
            "space opera with rebels and an empire",
            "space station drama",
            "courtroom drama with a rebel lawyer",
            "animated family comedy",
        ]);

        assert_eq!(matrix.len(), 4);
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                let score = matrix.get(i, j).unwrap();
                assert_eq!(score, matrix.get(j, i).unwrap());
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_matrix_agrees_with_pairwise_cosine() {
        let documents = ["heist thriller", "heist comedy", "war epic", "comedy of war"];
        let space = VectorSpace::fit_transform(&documents).unwrap();
        let matrix = SimilarityMatrix::from_vectors(space.vectors());

        for (i, a) in space.vectors().iter().enumerate() {
            for (j, b) in space.vectors().iter().enumerate().filter(|(j, _)| *j != i) {
                assert_eq!(matrix.get(i, j), Some(cosine_similarity(a, b)));
            }
        }
    }

    #[test]
    fn test_diagonal_is_one() {
        let matrix = matrix_for(&["heist thriller", "heist comedy", "war epic"]);
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), Some(1.0));
        }
    }

    #[test]
    fn test_zero_vector_has_zero_self_similarity() {
        let matrix = matrix_for(&["heist thriller", "? !"]);
        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(1, 1), Some(0.0));
        assert_eq!(matrix.get(0, 1), Some(0.0));
    }

    #[test]
    fn test_more_overlap_scores_higher() {
        let matrix = matrix_for(&[
            "prison escape drama",
            "prison escape thriller",
            "romantic musical",
        ]);
        let row = matrix.row(0).unwrap();
        assert!(row[1] > row[2]);
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let matrix = matrix_for(&["only one"]);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.row(1), None);
        assert_eq!(matrix.row(0), Some(&[1.0][..]));
    }
}
