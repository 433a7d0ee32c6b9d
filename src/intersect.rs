/// An intersection.
///
/// `t` is the offset along the ray, and `index` is the position of the hit
/// shape in its scene's object list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: f64,
    pub index: usize,
}

impl Intersection {
    pub fn new(t: f64, index: usize) -> Intersection {
        Intersection { t, index }
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` objects, gathered by
/// testing one ray against every shape of a scene.
#[derive(Clone, Debug, Default)]
pub struct Intersections {
    pub intersections: Vec<Intersection>,
}

impl Intersections {
    pub fn new() -> Intersections {
        Intersections { intersections: Vec::new() }
    }

    pub fn push(&mut self, i: Intersection) {
        self.intersections.push(i);
    }

    /// Returns the nearest non-negative, finite intersection.
    ///
    /// On a tie the intersection pushed first wins, so the result doesn't
    /// depend on anything but the order of the scene's objects.
    pub fn hit(&self) -> Option<Intersection> {
        self.intersections.iter()
            .filter(|i| i.t.is_finite() && i.t >= 0.0)
            .fold(None, |nearest: Option<Intersection>, i| match nearest {
                Some(n) if n.t <= i.t => Some(n),
                _ => Some(*i),
            })
    }
}

impl std::iter::FromIterator<Intersection> for Intersections {
    fn from_iter<I: IntoIterator<Item = Intersection>>(iter: I) -> Self {
        Intersections { intersections: iter.into_iter().collect() }
    }
}

#[test]
fn hit_ignores_negative_and_infinite() {
    let is: Intersections = vec![
        Intersection::new(-1.0, 0),
        Intersection::new(f64::INFINITY, 1),
        Intersection::new(7.0, 2),
        Intersection::new(5.0, 3),
    ].into_iter().collect();

    assert_eq!(is.hit(), Some(Intersection::new(5.0, 3)));
}

#[test]
fn hit_prefers_first_on_tie() {
    let mut is = Intersections::new();
    is.push(Intersection::new(2.0, 4));
    is.push(Intersection::new(2.0, 1));

    assert_eq!(is.hit().map(|i| i.index), Some(4));
}

#[test]
fn no_hit_when_all_behind() {
    let mut is = Intersections::new();
    is.push(Intersection::new(-2.0, 0));

    assert_eq!(is.hit(), None);
    assert_eq!(Intersections::new().hit(), None);
}
