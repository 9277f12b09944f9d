use crate::state::{Character, Coord};

/// Linear scan for the candidate closest to `origin`.
///
/// Uses squared Euclidean distance; on ties the first candidate seen wins.
pub fn nearest<'a>(
    origin: Coord,
    candidates: impl IntoIterator<Item = &'a Character>,
) -> Option<&'a Character> {
    let mut best: Option<(&Character, i64)> = None;
    for candidate in candidates {
        let distance = origin.distance_squared(candidate.position());
        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(character, _)| character)
}
