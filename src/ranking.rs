use std::cmp::Ordering;

use crate::entities::movie;

#[derive(Clone, Debug, PartialEq)]
pub struct RankedMovie {
    /// 1 is the best.
    pub rank: u32,
    pub movie: movie::Model,
}

/// Orders movies best first and numbers them 1..=N.
///
/// Rated movies sort by rating descending, ties broken by ascending id so that
/// the earlier addition wins. Unrated movies follow, also by ascending id.
pub fn rank(mut movies: Vec<movie::Model>) -> Vec<RankedMovie> {
    movies.sort_by(compare);

    movies
        .into_iter()
        .zip(1..)
        .map(|(movie, rank)| RankedMovie { rank, movie })
        .collect()
}

fn compare(a: &movie::Model, b: &movie::Model) -> Ordering {
    let by_rating = match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rating.then(a.id.cmp(&b.id))
}
