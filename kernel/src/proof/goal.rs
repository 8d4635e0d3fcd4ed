//! Goal test: is every face a single color?

use crate::carrier::configuration::{Configuration, Face};

/// True iff every face's facelets share one color.
///
/// Distinct colors across faces are not required; a configuration reusing a
/// color on two faces is unreachable from the solved state.
#[must_use]
pub fn is_solved(configuration: &Configuration) -> bool {
    Face::ALL.iter().all(|&face| {
        let facelets = configuration.face(face);
        facelets.iter().all(|&c| c == facelets[0])
    })
}
